use crate::kerberos::ccache::types::*;
use chrono::{Local, TimeZone};

pub fn format_timestamp(timestamp: u32) -> String {
    if timestamp == 0 {
        return "-".to_string();
    }

    if let Some(dt) = Local.timestamp_opt(timestamp as i64, 0).single() {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        format!("Invalid timestamp: {}", timestamp)
    }
}

pub fn format_times(times: &TicketTimes) -> String {
    format!(
        "start {}, end {}, renew until {}",
        format_timestamp(times.start_time),
        format_timestamp(times.end_time),
        format_timestamp(times.renew_till)
    )
}

pub fn get_credential_summary(cred: &Credential) -> String {
    let cred_type = if cred.is_tgt() {
        "TGT"
    } else {
        "Service Ticket"
    };

    format!(
        "{}: {} → {} ({})",
        cred_type,
        cred.client,
        cred.server,
        format_times(&cred.times)
    )
}
