//! `sff manual`: interactive Manual Entry tab
//!
//! Each add round prompts business name and city, offers the license
//! lookup, then prompts the account number prefilled from it.

use dialoguer::{Confirm, Input, Select};
use sff_common::{FormFillerApi, ManualEntryTab, ManualField};

use crate::error::Result;

enum Action {
    Add,
    Remove,
    List,
    Quit,
}

const ACTIONS: &[&str] = &["Add account", "Remove account", "List accounts", "Quit"];

fn prompt_field(tab: &ManualEntryTab, field: ManualField) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(field.label())
        .with_initial_text(tab.value(field))
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

pub fn print_accounts(tab: &ManualEntryTab) {
    if tab.accounts().is_empty() {
        println!("No accounts added yet");
        return;
    }
    for (index, account) in tab.accounts().iter().enumerate() {
        println!(
            "{:>3}) Account: {} | Business: {} | City: {}",
            index + 1,
            account.account_number.as_deref().unwrap_or("N/A"),
            account.client.as_deref().unwrap_or("N/A"),
            account.city.as_deref().unwrap_or("N/A"),
        );
    }
}

async fn add_round(tab: &mut ManualEntryTab, api: &dyn FormFillerApi) -> Result<()> {
    let client = prompt_field(tab, ManualField::Client)?;
    tab.handle_change(ManualField::Client, client);
    let city = prompt_field(tab, ManualField::City)?;
    tab.handle_change(ManualField::City, city);

    if tab.can_scrape()
        && Confirm::new()
            .with_prompt("Look up the business license?")
            .default(false)
            .interact()?
    {
        // Failures are already in the session log
        match tab.scrape(api).await {
            Ok(Some(license)) => println!("✔ Found business license: {license}"),
            Ok(None) => println!("No business license found"),
            Err(err) => println!("Scraping failed: {err}"),
        }
    }

    let account = prompt_field(tab, ManualField::AccountNumber)?;
    tab.handle_change(ManualField::AccountNumber, account);

    match tab.add_account(api).await {
        Ok(()) => println!("✔ Account added"),
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn remove_round(tab: &mut ManualEntryTab) -> Result<()> {
    if tab.accounts().is_empty() {
        println!("No accounts added yet");
        return Ok(());
    }
    let items: Vec<String> = tab
        .accounts()
        .iter()
        .map(|a| {
            format!(
                "{} - {} - {}",
                a.account_number.as_deref().unwrap_or("N/A"),
                a.client.as_deref().unwrap_or("N/A"),
                a.city.as_deref().unwrap_or("N/A")
            )
        })
        .collect();
    let index = Select::new()
        .with_prompt("Remove which account?")
        .items(&items)
        .default(0)
        .interact()?;
    tab.select(index);
    if let Some(removed) = tab.remove_selected() {
        println!("✔ Removed {}", removed.account_number_or("Unknown"));
    }
    Ok(())
}

pub async fn run_manual(tab: &mut ManualEntryTab, api: &dyn FormFillerApi) -> Result<()> {
    println!("📝 Saccani Form Filler - manual entry\n");

    loop {
        let choice = Select::new()
            .with_prompt("Action")
            .items(ACTIONS)
            .default(0)
            .interact()?;
        let action = match choice {
            0 => Action::Add,
            1 => Action::Remove,
            2 => Action::List,
            _ => Action::Quit,
        };

        match action {
            Action::Add => add_round(tab, api).await?,
            Action::Remove => remove_round(tab)?,
            Action::List => print_accounts(tab),
            Action::Quit => break,
        }
        println!();
    }

    print_accounts(tab);
    Ok(())
}
