//! Interactive prompting port
//!
//! All operator interaction goes through the [`Prompter`] trait so the
//! resolver and network switcher can be driven by a scripted fake in
//! tests. The real implementation uses `dialoguer`.

use dialoguer::{Input, Select};

use crate::error::{WallyError, WallyResult};

/// Port for interactive operator input.
pub trait Prompter {
    /// Ask for a free-form line of input.
    fn input(&self, message: &str) -> WallyResult<String>;

    /// Ask the operator to pick one of `items`, returning the selection.
    fn select(&self, message: &str, items: &[String]) -> WallyResult<String>;
}

/// Terminal prompter backed by `dialoguer`.
pub struct InteractivePrompter;

impl Prompter for InteractivePrompter {
    fn input(&self, message: &str) -> WallyResult<String> {
        Input::<String>::new()
            .with_prompt(message)
            .interact_text()
            .map_err(|e| WallyError::PromptAborted(e.to_string()))
    }

    fn select(&self, message: &str, items: &[String]) -> WallyResult<String> {
        let index = Select::new()
            .with_prompt(message)
            .items(items)
            .default(0)
            .interact()
            .map_err(|e| WallyError::PromptAborted(e.to_string()))?;
        Ok(items[index].clone())
    }
}
