use crate::treasury::TokenBalance;
use crate::verifier::Verification;
use alloy_primitives::U256;
use alloy_primitives::utils::format_units;
use comfy_table::{Cell, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use csv::Writer;
use serde_json::json;

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Table,
        }
    }
}

pub fn format_verification(result: &Verification, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec!["Verified", "Observed Treasury Transfers"]);

            let observed = if result.observed_amounts.is_empty() {
                "none".to_string()
            } else {
                result.observed_amounts.join(", ")
            };
            table.add_row(vec![Cell::new(result.verified), Cell::new(observed)]);

            table.to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "verified": result.verified,
            "observed_amounts": result.observed_amounts,
        }))
        .unwrap_or_else(|_| "{}".to_string()),
        OutputFormat::Csv => {
            let mut wtr = Writer::from_writer(vec![]);
            let _ = wtr.write_record(["verified", "observed_amounts"]);
            let _ = wtr.write_record([
                &result.verified.to_string(),
                &result.observed_amounts.join(";"),
            ]);
            String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
        }
    }
}

pub fn format_balances(balances: &[TokenBalance], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_balances_table(balances),
        OutputFormat::Json => format_balances_json(balances),
        OutputFormat::Csv => format_balances_csv(balances),
    }
}

fn formatted_amount(balance: &TokenBalance) -> String {
    balance
        .amount
        .amount
        .parse::<U256>()
        .ok()
        .and_then(|raw| format_units(raw, balance.amount.decimals).ok())
        .unwrap_or_else(|| balance.amount.amount.clone())
}

fn format_balances_table(balances: &[TokenBalance]) -> String {
    if balances.is_empty() {
        return "No token balances found.".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Token", "Symbol", "Amount", "Amount (raw)"]);

    for balance in balances {
        table.add_row(vec![
            Cell::new(&balance.token.contract_address),
            Cell::new(balance.token.symbol.as_deref().unwrap_or("?")),
            Cell::new(formatted_amount(balance)),
            Cell::new(&balance.amount.amount),
        ]);
    }

    table.to_string()
}

fn format_balances_json(balances: &[TokenBalance]) -> String {
    let json_balances: Vec<_> = balances
        .iter()
        .map(|b| {
            json!({
                "token": b.token.contract_address,
                "symbol": b.token.symbol,
                "amount": formatted_amount(b),
                "amount_raw": b.amount.amount,
            })
        })
        .collect();

    serde_json::to_string_pretty(&json_balances).unwrap_or_else(|_| "[]".to_string())
}

fn format_balances_csv(balances: &[TokenBalance]) -> String {
    let mut wtr = Writer::from_writer(vec![]);

    let _ = wtr.write_record(["token", "symbol", "amount", "amount_raw"]);

    for balance in balances {
        let _ = wtr.write_record([
            balance.token.contract_address.as_str(),
            balance.token.symbol.as_deref().unwrap_or(""),
            &formatted_amount(balance),
            balance.amount.amount.as_str(),
        ]);
    }

    String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
}
