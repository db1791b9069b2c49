use super::customer::balance_serialize;
use super::record::{self, RecordError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::str::FromStr;

/// Bank account shown on the account page.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    customer_name: String,
    account_type: String,
    #[serde(serialize_with = "balance_serialize")]
    balance: Decimal,
    date_of_creation: String,
    bank_name: String,
    branch_name: String,
    pan_card_number: String,
}

impl BankAccount {
    pub fn sample() -> Self {
        Self {
            customer_name: "John Doe".into(),
            account_type: "Savings".into(),
            balance: dec!(5000),
            date_of_creation: "2023-06-15".into(),
            bank_name: "ABC Bank".into(),
            branch_name: "Downtown Branch".into(),
            pan_card_number: "ABCDE1234F".into(),
        }
    }

    /// The account as the details page declares it.
    pub fn details_sample() -> Self {
        Self {
            date_of_creation: "2024-01-15".into(),
            branch_name: "Downtown".into(),
            ..Self::sample()
        }
    }
}

/// The two ways the account page has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Headed sections, entries separated by `<br>`, both key checks.
    Summary,
    /// A details block with one entry per line and a single key check.
    Details,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(Layout::Summary),
            "details" => Ok(Layout::Details),
            other => Err(format!("unknown layout '{other}', expected summary or details")),
        }
    }
}

impl Layout {
    /// The account each page is written against.
    pub fn sample_account(&self) -> BankAccount {
        match self {
            Layout::Summary => BankAccount::sample(),
            Layout::Details => BankAccount::details_sample(),
        }
    }

    pub fn list_entries<T: Serialize>(&self, record: &T) -> Result<String, RecordError> {
        match self {
            Layout::Summary => record::list_entries(record),
            Layout::Details => {
                let mut result = String::from("<strong>Bank Account Details:</strong><br>");
                for (key, value) in record::fields(record)? {
                    result.push_str(&record::entry_line(&key, &value));
                    result.push_str(" <br>");
                }
                Ok(result)
            }
        }
    }

    pub fn get_key<T: Serialize>(&self, record: &T, key: &str) -> Result<String, RecordError> {
        match self {
            Layout::Summary => record::get_key(record, key),
            Layout::Details => Ok(match record::fields(record)?.get(key) {
                Some(value) => format!(
                    "<strong>{key} exists.</strong> Value: {}",
                    record::display_value(value)
                ),
                None => format!("<strong>{key} does not exist.</strong>"),
            }),
        }
    }
}

/// HTML written into the page's output element once the page has loaded.
pub fn render_account_page(account: &BankAccount, layout: Layout) -> anyhow::Result<String> {
    let page = match layout {
        Layout::Summary => [
            "<h3>Bank Account Entries:</h3>".to_string(),
            layout.list_entries(account)?,
            "<br><br>".to_string(),
            "<h3>Checking Key Existence:</h3>".to_string(),
            format!("{} <br>", layout.get_key(account, "balance")?),
            layout.get_key(account, "ifscCode")?,
        ]
        .join("\n"),
        Layout::Details => format!(
            "{}<br>{}",
            layout.list_entries(account)?,
            layout.get_key(account, "balance")?
        ),
    };

    debug!("rendered {layout:?} account page ({} bytes)", page.len());
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const FIELDS: [(&str, &str); 7] = [
        ("customerName", "John Doe"),
        ("accountType", "Savings"),
        ("balance", "5000"),
        ("dateOfCreation", "2023-06-15"),
        ("bankName", "ABC Bank"),
        ("branchName", "Downtown Branch"),
        ("panCardNumber", "ABCDE1234F"),
    ];

    #[test]
    fn one_line_per_field() {
        let listed = record::list_entries(&BankAccount::sample()).unwrap();

        let lines: Vec<&str> = listed.split("<br>").collect();
        assert_eq!(lines.len(), FIELDS.len());
        for (line, (field, value)) in lines.iter().zip(FIELDS) {
            assert_eq!(*line, format!("<strong>{field}:</strong> {value}"));
        }
    }

    #[test_case(Layout::Summary, "balance", "<strong>balance exists:</strong> 5000")]
    #[test_case(Layout::Summary, "ifscCode", "<strong>ifscCode not found.</strong>")]
    #[test_case(Layout::Details, "balance", "<strong>balance exists.</strong> Value: 5000")]
    #[test_case(Layout::Details, "ifscCode", "<strong>ifscCode does not exist.</strong>")]
    fn key_checks(layout: Layout, key: &str, expected: &str) {
        assert_eq!(layout.get_key(&BankAccount::sample(), key).unwrap(), expected);
    }

    #[test]
    fn summary_page() {
        let page = render_account_page(&BankAccount::sample(), Layout::Summary).unwrap();

        let lines: Vec<&str> = page.lines().collect();
        assert_eq!(lines[0], "<h3>Bank Account Entries:</h3>");
        assert!(lines[1].starts_with("<strong>customerName:</strong> John Doe<br>"));
        assert_eq!(lines[2], "<br><br>");
        assert_eq!(lines[3], "<h3>Checking Key Existence:</h3>");
        assert_eq!(lines[4], "<strong>balance exists:</strong> 5000 <br>");
        assert_eq!(lines[5], "<strong>ifscCode not found.</strong>");
    }

    #[test]
    fn details_page() {
        let page = render_account_page(&Layout::Details.sample_account(), Layout::Details).unwrap();

        assert!(page.starts_with(
            "<strong>Bank Account Details:</strong><br><strong>customerName:</strong> John Doe <br>"
        ));
        assert!(page.contains("<strong>dateOfCreation:</strong> 2024-01-15 <br>"));
        assert!(page.contains("<strong>branchName:</strong> Downtown <br>"));
        assert!(page.ends_with(
            "<strong>panCardNumber:</strong> ABCDE1234F <br><br><strong>balance exists.</strong> Value: 5000"
        ));
    }

    #[test]
    fn each_layout_has_its_own_account() {
        assert_eq!(Layout::Summary.sample_account(), BankAccount::sample());
        assert_eq!(Layout::Details.sample_account(), BankAccount::details_sample());
        assert_ne!(BankAccount::sample(), BankAccount::details_sample());
    }

    #[test_case("summary", Ok(Layout::Summary) ; "summary")]
    #[test_case("Details", Ok(Layout::Details) ; "case insensitive")]
    #[test_case("table", Err("unknown layout 'table', expected summary or details".to_string()) ; "unknown")]
    fn parses_layout(input: &str, expected: Result<Layout, String>) {
        assert_eq!(input.parse::<Layout>(), expected);
    }
}
