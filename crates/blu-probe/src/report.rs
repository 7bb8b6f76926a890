//! Human-readable rendering of probe results.

use blu_probe_core::rpc::Balance;
use serde_json::Value;

/// Format an integer with `,` thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Render a balance as satoshis and whole coins, one line per component.
pub fn balance_summary(balance: &Balance, ticker: &str) -> String {
    let rows = [
        ("Confirmed:  ", balance.confirmed, balance.confirmed_amount()),
        ("Unconfirmed:", balance.unconfirmed, balance.unconfirmed_amount()),
        ("Total:      ", balance.total(), balance.total_amount()),
    ];
    let mut summary = String::from("Balance Summary:\n");
    for (label, sats, amount) in rows {
        summary.push_str(&format!(
            "  {label} {} satoshis ({:.8} {ticker})\n",
            group_thousands(sats),
            amount.to_btc()
        ));
    }
    summary
}

/// Render a raw `get_balance` reply followed by its summary, or by an error
/// line when the reply is not a balance object.
pub fn balance_reply(method: &str, raw: Value, ticker: &str) -> String {
    let mut rendered = format!("{method} → {raw}\n\n");
    match serde_json::from_value::<Balance>(raw) {
        Ok(balance) => rendered.push_str(&balance_summary(&balance, ticker)),
        Err(err) => rendered.push_str(&format!("Error: unexpected balance reply: {err}\n")),
    }
    rendered
}

/// Build a multi-line error message with a hint for common connection
/// failures.
pub fn format_connect_error(endpoint: &str, source_error: &str) -> String {
    let mut lines = vec![
        format!("could not connect to Electrum server `{endpoint}`"),
        format!("error: {source_error}"),
    ];

    if source_error.contains("failed to lookup address")
        || source_error.contains("Name or service not known")
    {
        lines.push(
            "hint: hostname resolution failed; verify the host name and your DNS/network"
                .into(),
        );
    } else if source_error.contains("refused") {
        lines.push(
            "hint: nothing is listening on that port; verify --port (TLS ports are not supported)"
                .into(),
        );
    } else if source_error.contains("timed out") {
        lines.push(
            "hint: the server did not answer in time; raise --timeout-secs or check firewalls"
                .into(),
        );
    }

    lines.join("\n")
}
