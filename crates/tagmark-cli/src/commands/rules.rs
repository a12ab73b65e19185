//! Rules command handler

use anyhow::Result;

use tagmark_core::Store;

use crate::output::Output;

/// Print the keyword tables the classifier is running with
pub fn show(store: &Store, output: &Output) -> Result<()> {
    output.print_rules(store.classifier().rules())
}
