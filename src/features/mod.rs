mod account;
mod customer;
mod page;
mod record;
mod server;
mod store;

pub use self::{
    account::{render_account_page, Layout},
    customer::CustomerUpdate,
    page::{Action, MERGE_BUTTON_ID, OUTPUT_ELEMENT_ID, TOTAL_BUTTON_ID},
    server::StaticServer,
    store::Ledger,
};
