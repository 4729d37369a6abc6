//! Search operation over the published package list

use console::style;
use serde::Deserialize;
use tracing::debug;

use super::OperationContext;
use crate::error::{AkamaiError, Result};
use crate::manifest::Command;

/// Default location of the package list
pub const DEFAULT_PACKAGE_LIST_URL: &str = "https://developer.akamai.com/cli/package-list.json";

/// Environment variable overriding [`DEFAULT_PACKAGE_LIST_URL`]
pub const PACKAGE_LIST_ENV: &str = "AKAMAI_CLI_PACKAGE_REPO";

/// One published package
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackageListing {
    pub name: String,
    pub title: String,
    pub url: String,
    pub commands: Vec<Command>,
}

impl PackageListing {
    fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        let contains = |text: &str| text.to_lowercase().contains(&keyword);

        contains(&self.name)
            || contains(&self.title)
            || self
                .commands
                .iter()
                .any(|c| contains(&c.name) || contains(&c.description))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PackageList {
    packages: Vec<PackageListing>,
}

/// Package list URL, honouring the override variable
pub fn package_list_url() -> String {
    std::env::var(PACKAGE_LIST_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PACKAGE_LIST_URL.to_string())
}

pub struct SearchOperation<'a> {
    ctx: &'a OperationContext<'a>,
    url: String,
}

impl<'a> SearchOperation<'a> {
    pub fn new(ctx: &'a OperationContext<'a>, url: String) -> Self {
        Self { ctx, url }
    }

    /// Packages matching any of `keywords`, sorted by name
    pub fn find(&self, keywords: &[String]) -> Result<Vec<PackageListing>> {
        let body = self.ctx.fetcher.get(&self.url)?;
        let list: PackageList =
            serde_json::from_slice(&body).map_err(|e| AkamaiError::HttpFailed {
                url: self.url.clone(),
                reason: format!("invalid package list: {e}"),
            })?;
        debug!(packages = list.packages.len(), "fetched package list");

        let mut found: Vec<PackageListing> = list
            .packages
            .into_iter()
            .filter(|p| keywords.iter().any(|k| p.matches(k)))
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    /// Print matching packages
    pub fn execute(&self, keywords: &[String]) -> Result<usize> {
        let terminal = self.ctx.terminal;
        terminal.spinner_start("Fetching packages");
        let found = match self.find(keywords) {
            Ok(found) => {
                terminal.spinner_ok();
                found
            }
            Err(e) => {
                terminal.spinner_fail();
                return Err(e);
            }
        };

        if found.is_empty() {
            terminal.writeln(&format!("No results found for: {}", keywords.join(" ")));
            return Ok(0);
        }

        terminal.writeln(&style("Results Found:").bold().to_string());
        for package in &found {
            terminal.writeln("");
            terminal.writeln(&format!(
                "Package: {} [{}]",
                style(&package.title).bold(),
                package.name
            ));
            terminal.writeln(&format!("  Repository: {}", package.url));
            for command in &package.commands {
                terminal.writeln(&format!(
                    "  Command: {} {}",
                    style(&command.name).green(),
                    command.description
                ));
            }
        }
        terminal.writeln("");
        terminal.writeln("Install using \"akamai install [package]\".");

        Ok(found.len())
    }
}
