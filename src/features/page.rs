use super::customer::CustomerUpdate;
use super::store::Ledger;
use thiserror::Error;

/// Element the ledger page writes its results into.
pub const OUTPUT_ELEMENT_ID: &str = "output";

pub const MERGE_BUTTON_ID: &str = "mergeAccounts";
pub const TOTAL_BUTTON_ID: &str = "calculateTotalBalance";

#[derive(Error, Debug)]
pub enum PageError {
    #[error("No button with id '{0}'")]
    UnknownButton(String),

    #[error("Cannot render output - {0}")]
    Render(#[from] serde_json::Error),
}

type PageResult<T> = anyhow::Result<T, PageError>;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    MergeAccounts,
    CalculateTotalBalance,
    UpdateCustomer(CustomerUpdate),
}

impl Action {
    /// Action wired to the button with element id `id`.
    pub fn from_button(id: &str) -> PageResult<Self> {
        match id {
            MERGE_BUTTON_ID => Ok(Action::MergeAccounts),
            TOTAL_BUTTON_ID => Ok(Action::CalculateTotalBalance),
            other => Err(PageError::UnknownButton(other.to_string())),
        }
    }
}

impl Ledger {
    /// Runs `action` and returns the text the output element ends up with.
    pub fn handle(&mut self, action: Action) -> PageResult<String> {
        let text = match action {
            Action::MergeAccounts => {
                let merged = self.merge_accounts();
                info!("Merged Accounts: {merged:?}");
                format!("Merged Accounts: {}", serde_json::to_string_pretty(&merged)?)
            }
            Action::UpdateCustomer(update) => {
                let customers = self.update_customer(update);
                info!("Updated Customers: {customers:?}");
                format!("Updated Customers: {}", serde_json::to_string_pretty(customers)?)
            }
            Action::CalculateTotalBalance => {
                let total = self.calculate_total_balance();
                info!("Total Balance: {total}");
                format!("Total Balance: ${total}")
            }
        };

        Ok(text)
    }
}
