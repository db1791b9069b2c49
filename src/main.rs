use std::fs::File;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
#[macro_use]
extern crate log;

mod features;
use features::{
    render_account_page, Action, CustomerUpdate, Layout, Ledger, StaticServer,
    MERGE_BUTTON_ID, OUTPUT_ELEMENT_ID, TOTAL_BUTTON_ID,
};

/// Bank account exercises: an account page, a ledger page and the server for them.
#[derive(Parser, Debug)]
#[clap(name = "bank-demos", version)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the page and the files next to it
    Serve {
        #[clap(long, default_value = "127.0.0.1")]
        host: String,
        #[clap(long, default_value_t = 8081)]
        port: u16,
        #[clap(long, default_value = "public")]
        root: PathBuf,
    },
    /// Print the account page HTML
    Account {
        #[clap(long, default_value = "summary")]
        layout: Layout,
    },
    /// Check whether the sample account has a field
    Key {
        name: String,
        #[clap(long, default_value = "summary")]
        layout: Layout,
    },
    /// Click "Merge Accounts"
    Merge(LedgerArgs),
    /// Click "Calculate Total Balance"
    Total(LedgerArgs),
    /// Update a customer by id, appending it when the id is unknown
    Update {
        #[clap(long)]
        id: u32,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        balance: Option<Decimal>,
        #[clap(flatten)]
        ledger: LedgerArgs,
    },
    /// Click both buttons, then apply the scheduled update
    Demo(LedgerArgs),
}

#[derive(Args, Debug)]
struct LedgerArgs {
    /// CSV file of `id, name, balance` rows for the customers list
    #[clap(long, requires = "accounts")]
    customers: Option<PathBuf>,
    /// CSV file of `id, name, balance` rows for the accounts list
    #[clap(long, requires = "customers")]
    accounts: Option<PathBuf>,
}

impl LedgerArgs {
    fn load(&self) -> anyhow::Result<Ledger> {
        match (&self.customers, &self.accounts) {
            (Some(customers), Some(accounts)) => {
                let customers = File::open(customers)
                    .with_context(|| format!("Unable to open {}", customers.display()))?;
                let accounts = File::open(accounts)
                    .with_context(|| format!("Unable to open {}", accounts.display()))?;
                Ok(Ledger::from_csv(customers, accounts)?)
            }
            _ => Ok(Ledger::sample()),
        }
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Cli::parse()) {
        error!("{e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve { host, port, root } => {
            StaticServer::bind(format!("{host}:{port}"), root)?.serve()?;
        }
        Command::Account { layout } => {
            println!("{}", render_account_page(&layout.sample_account(), layout)?);
        }
        Command::Key { name, layout } => {
            println!("{}", layout.get_key(&layout.sample_account(), &name)?);
        }
        Command::Merge(ledger) => click(&mut ledger.load()?, MERGE_BUTTON_ID)?,
        Command::Total(ledger) => click(&mut ledger.load()?, TOTAL_BUTTON_ID)?,
        Command::Update {
            id,
            name,
            balance,
            ledger,
        } => {
            let update = CustomerUpdate {
                name,
                balance,
                ..CustomerUpdate::new(id)
            };
            show(ledger.load()?.handle(Action::UpdateCustomer(update))?);
        }
        Command::Demo(ledger) => {
            let mut ledger = ledger.load()?;
            click(&mut ledger, MERGE_BUTTON_ID)?;
            click(&mut ledger, TOTAL_BUTTON_ID)?;
            show(ledger.handle(Action::UpdateCustomer(CustomerUpdate::scheduled()))?);
        }
    }

    Ok(())
}

fn click(ledger: &mut Ledger, button: &str) -> anyhow::Result<()> {
    debug!("click #{button}");
    show(ledger.handle(Action::from_button(button)?)?);
    Ok(())
}

fn show(text: String) {
    debug!("#{OUTPUT_ELEMENT_ID} <- {} bytes", text.len());
    println!("{text}");
}
