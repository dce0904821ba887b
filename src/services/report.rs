use crate::domain::models::AuditResponse;

#[derive(thiserror::Error, Debug)]
#[error("no audit result available; run `compa audit` first")]
pub struct NoResultError;

/// The report layout is a compatibility surface: downstream tooling may
/// parse the exported file, so field order, labels, and rules are fixed.
pub fn generate(response: &AuditResponse, generated_at: &str) -> String {
    let banner = "=".repeat(70);
    let mut out = String::new();

    out.push_str(&banner);
    out.push('\n');
    out.push_str("          COMPLIANCE AUDIT REPORT\n");
    out.push_str(&banner);
    out.push_str("\n\n");

    out.push_str(&format!("Policy Document:    {}\n", response.policy_name));
    out.push_str(&format!("Date & Time:        {}\n", generated_at));
    out.push_str(&format!(
        "Total Violations:   {}\n",
        response.total_violations
    ));
    out.push_str("Status:             Completed\n");
    out.push_str(&format!("\n{}\n\n", banner));

    if !response.violations.is_empty() {
        out.push_str("VIOLATIONS DETECTED:\n\n");
        for (i, v) in response.violations.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, v.event_type));
            out.push_str(&format!("   {}\n", "\u{2500}".repeat(65)));
            out.push_str(&format!("   Subject ID:  {}\n", v.subject_id));
            out.push_str(&format!("   Value:       {:.2}\n", v.val));
            out.push_str(&format!("   Reason:      {}\n", v.reason));
            out.push_str(&format!("   Source:      {}\n", v.source));
            out.push('\n');
        }
    } else {
        out.push_str("No violations found. All compliance checks passed.\n\n");
    }

    out.push_str(&banner);
    out.push('\n');
    out.push_str("End of Report - Generated by Compliance Agent\n");
    out.push_str(&banner);
    out.push('\n');
    out
}

pub fn default_file_name(now_millis: i64) -> String {
    format!("audit-report-{}.txt", now_millis)
}
