use super::store::Ledger;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord)]
pub struct CustomerId(pub u32);

/// Customer record. Ids are assumed unique, nothing checks it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(serialize_with = "balance_serialize")]
    pub balance: Decimal,
}

/// Whole amounts are written as integers (`5000`), anything else as a float.
pub(crate) fn balance_serialize<S>(amount: &Decimal, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match amount.to_i64() {
        Some(whole) if amount.fract().is_zero() => s.serialize_i64(whole),
        _ => s.serialize_f64(amount.to_f64().unwrap_or_default()),
    }
}

impl Customer {
    pub fn new(id: u32, name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id: CustomerId(id),
            name: name.into(),
            balance,
        }
    }

    /// Overlay the fields present in `update`, keeping the rest.
    fn apply(&mut self, update: &CustomerUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(balance) = update.balance {
            self.balance = balance;
        }
    }
}

/// Partial customer record keyed by id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomerUpdate {
    pub id: CustomerId,
    pub name: Option<String>,
    pub balance: Option<Decimal>,
}

impl CustomerUpdate {
    pub fn new(id: u32) -> Self {
        Self {
            id: CustomerId(id),
            name: None,
            balance: None,
        }
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    pub fn balance(self, balance: Decimal) -> Self {
        Self {
            balance: Some(balance),
            ..self
        }
    }

    /// The update the ledger page applies on its own shortly after loading.
    pub fn scheduled() -> Self {
        Self::new(1).name("Alice Johnson").balance(dec!(6000))
    }
}

impl From<CustomerUpdate> for Customer {
    fn from(update: CustomerUpdate) -> Self {
        Self {
            id: update.id,
            name: update.name.unwrap_or_default(),
            balance: update.balance.unwrap_or_default(),
        }
    }
}

impl Ledger {
    /// Customers followed by accounts. Neither list is touched.
    pub fn merge_accounts(&self) -> Vec<Customer> {
        self.customers
            .iter()
            .chain(self.accounts.iter())
            .cloned()
            .collect()
    }

    /// Overlays `update` onto the customer with the same id, or appends it as a
    /// new customer when there is none.
    pub fn update_customer(&mut self, update: CustomerUpdate) -> &[Customer] {
        match self.customers.iter_mut().find(|c| c.id == update.id) {
            Some(customer) => customer.apply(&update),
            None => self.customers.push(update.into()),
        }

        &self.customers
    }

    pub fn calculate_total_balance(&self) -> Decimal {
        self.customers
            .iter()
            .chain(self.accounts.iter())
            .map(|c| c.balance)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn merge_keeps_order_and_fields() {
        let ledger = Ledger::sample();

        let merged = ledger.merge_accounts();

        assert_eq!(
            merged,
            vec![
                Customer::new(1, "Alice", dec!(5000)),
                Customer::new(2, "Bob", dec!(3000)),
                Customer::new(3, "Charlie", dec!(7000)),
                Customer::new(4, "David", dec!(2000)),
            ]
        );
        assert_eq!(ledger.customers.len(), 2);
        assert_eq!(ledger.accounts.len(), 2);
    }

    #[test]
    fn scheduled_update_replaces_in_place() {
        let mut ledger = Ledger::sample();

        let customers = ledger.update_customer(CustomerUpdate::scheduled());

        assert_eq!(
            customers,
            &[
                Customer::new(1, "Alice Johnson", dec!(6000)),
                Customer::new(2, "Bob", dec!(3000)),
            ]
        );
    }

    #[test]
    fn partial_update_keeps_unspecified_fields() {
        let mut ledger = Ledger::sample();

        ledger.update_customer(CustomerUpdate::new(2).name("Robert"));

        assert_eq!(ledger.customers[1], Customer::new(2, "Robert", dec!(3000)));
    }

    #[test]
    fn unknown_id_is_appended() {
        let mut ledger = Ledger::sample();

        let customers = ledger.update_customer(CustomerUpdate::new(99).name("Eve").balance(dec!(1)));

        assert_eq!(customers.len(), 3);
        assert_eq!(customers[2], Customer::new(99, "Eve", dec!(1)));
    }

    #[test]
    fn account_ids_are_not_searched() {
        let mut ledger = Ledger::sample();

        ledger.update_customer(CustomerUpdate::new(3).balance(dec!(10)));

        assert_eq!(ledger.customers[2], Customer::new(3, "", dec!(10)));
        assert_eq!(ledger.accounts[0], Customer::new(3, "Charlie", dec!(7000)));
    }

    #[test]
    fn total_of_sample_lists() {
        assert_eq!(Ledger::sample().calculate_total_balance(), dec!(17000));
    }

    #[test]
    fn total_follows_updates() {
        let mut ledger = Ledger::sample();

        ledger.update_customer(CustomerUpdate::scheduled());

        assert_eq!(ledger.calculate_total_balance(), dec!(18000));
    }

    #[test_case(dec!(5000), "5000" ; "whole")]
    #[test_case(dec!(12.5), "12.5" ; "fraction")]
    #[test_case(dec!(-3), "-3" ; "negative")]
    fn balances_serialize_as_numbers(balance: Decimal, expected: &str) {
        let customer = Customer::new(1, "Alice", balance);

        let json = serde_json::to_string(&customer).unwrap();

        assert_eq!(json, format!(r#"{{"id":1,"name":"Alice","balance":{expected}}}"#));
    }
}
