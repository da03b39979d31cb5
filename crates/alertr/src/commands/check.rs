use serde::Serialize;
use tabled::Tabled;

use alertr_core::StoreCounts;

use crate::cli::{CheckArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;
use crate::topology::Rejection;

#[derive(Debug, Serialize)]
struct CheckReport {
    counts: StoreCounts,
    rejected: Vec<Rejection>,
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Records")]
    count: usize,
}

#[derive(Tabled)]
struct RejectionRow<'a> {
    #[tabled(rename = "Kind")]
    entity: &'a str,
    #[tabled(rename = "Key")]
    key: &'a str,
    #[tabled(rename = "Reason")]
    reason: &'a str,
}

pub fn handle(args: &CheckArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let loaded = super::load(&args.topology, global)?;
    let report = CheckReport {
        counts: loaded.store.counts(),
        rejected: loaded.rejected,
    };

    let out = output::render_single(global.output, &report, detail)?;
    output::print_output(&out, global.quiet)?;

    match report.rejected.len() {
        0 => Ok(()),
        count => Err(CliError::Rejected { count }),
    }
}

fn detail(report: &CheckReport) -> String {
    let c = &report.counts;
    let counts = [
        ("options", c.options),
        ("nodes", c.nodes),
        ("sensors", c.sensors),
        ("alerts", c.alerts),
        ("managers", c.managers),
        ("alert levels", c.alert_levels),
        ("sensor alerts", c.sensor_alerts),
    ]
    .map(|(kind, count)| CountRow { kind, count });

    let mut out = output::render_table(&counts);
    if !report.rejected.is_empty() {
        let rows: Vec<RejectionRow<'_>> = report
            .rejected
            .iter()
            .map(|r| RejectionRow {
                entity: r.entity,
                key: &r.key,
                reason: &r.reason,
            })
            .collect();
        out.push_str("\n\nRejected:\n");
        out.push_str(&output::render_table(&rows));
    }
    out
}
