use std::io;

use super::customer::Customer;
use rust_decimal_macros::dec;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Unreadable ledger data - {0}")]
    Csv(#[from] csv::Error),
}

type LedgerResult<T> = anyhow::Result<T, LedgerError>;

/// The two record lists behind the ledger page.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub(crate) customers: Vec<Customer>,
    pub(crate) accounts: Vec<Customer>,
}

impl Ledger {
    pub(crate) fn new(customers: Vec<Customer>, accounts: Vec<Customer>) -> Self {
        Self {
            customers,
            accounts,
        }
    }

    pub fn sample() -> Self {
        Self::new(
            vec![
                Customer::new(1, "Alice", dec!(5000)),
                Customer::new(2, "Bob", dec!(3000)),
            ],
            vec![
                Customer::new(3, "Charlie", dec!(7000)),
                Customer::new(4, "David", dec!(2000)),
            ],
        )
    }

    /// Reads both lists from `id, name, balance` CSV with a header row.
    pub fn from_csv(customers: impl io::Read, accounts: impl io::Read) -> LedgerResult<Self> {
        Ok(Self::new(read_customers(customers)?, read_customers(accounts)?))
    }
}

fn read_customers(data: impl io::Read) -> LedgerResult<Vec<Customer>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut customers = Vec::new();
    for result in rdr.deserialize() {
        let customer: Customer = result?;
        customers.push(customer);
    }

    Ok(customers)
}
