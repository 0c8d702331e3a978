//! Commands over stored texts.

use super::{open_service, read_input, to_json};
use crate::Result;
use crate::config::ParadupConfig;
use crate::models::{EntryId, Scope};
use std::path::Path;

/// Reports duplicates of a file without storing it.
///
/// Compares against the owner's texts, or every stored text when no owner
/// is given.
///
/// # Errors
///
/// Returns an error if the input or corpus cannot be read.
pub fn cmd_check(config: &ParadupConfig, file: &Path, owner: Option<&str>) -> Result<String> {
    let text = read_input(file)?;
    let scope = owner.map_or(Scope::All, Scope::owner);
    let report = open_service(config)?.check(&text, &scope)?;
    to_json(&report)
}

/// Reports duplicates of a file against the owner's texts, then stores it.
///
/// # Errors
///
/// Returns an error if the input is blank or unreadable, or the corpus
/// cannot be read or written.
pub fn cmd_submit(config: &ParadupConfig, file: &Path, owner: &str) -> Result<String> {
    let text = read_input(file)?;
    let submission = open_service(config)?.submit(&text, owner)?;
    to_json(&submission)
}

/// Prints a stored text with its report.
///
/// # Errors
///
/// Returns an error if the entry is not visible to `owner`.
pub fn cmd_show(config: &ParadupConfig, id: &str, owner: &str) -> Result<String> {
    let entry = open_service(config)?.get(&EntryId::new(id), owner)?;
    to_json(&entry)
}

/// Lists the owner's stored texts, newest first.
///
/// # Errors
///
/// Returns an error for a zero page or limit, or if the corpus cannot be read.
pub fn cmd_list(config: &ParadupConfig, owner: &str, page: usize, limit: usize) -> Result<String> {
    let page = open_service(config)?.list(owner, page, limit)?;
    to_json(&page)
}

/// Recomputes a stored text's report against the owner's other texts.
///
/// # Errors
///
/// Returns an error if the entry is not visible to `owner` or the corpus
/// cannot be read or written.
pub fn cmd_rescan(config: &ParadupConfig, id: &str, owner: &str) -> Result<String> {
    let report = open_service(config)?.rescan(&EntryId::new(id), owner)?;
    to_json(&report)
}
