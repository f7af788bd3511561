//! Report rendering for the CLI.
//!
//! The composer produces data only; this module turns a [`Report`] into the
//! text printed on stdout for each [`OutputFormat`].

use std::fmt::Write as _;

use abn_common::{OutputFormat, Result};

use crate::report::Report;

/// Render a report in the requested format. Output ends with a newline.
pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(report)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Md => Ok(render_markdown(report)),
        OutputFormat::Summary => Ok(render_summary(report)),
    }
}

/// One line: both verdicts and the strongest pairwise signal.
pub fn render_summary(report: &Report) -> String {
    let freq = &report.frequentist;
    let bayes = &report.bayesian;
    let best_prob = bayes
        .posteriors
        .iter()
        .find(|p| p.group == bayes.best_group)
        .map(|p| p.prob_best)
        .unwrap_or(0.0);
    let significant = freq.comparisons.iter().filter(|c| c.significant).count();

    let mut line = format!(
        "groups={} frequentist_best={} bayesian_best={} p_best={:.3} significant_pairs={}/{}",
        report.group_count(),
        freq.best_group,
        bayes.best_group,
        best_prob,
        significant,
        freq.comparisons.len(),
    );
    if !report.verdicts_agree() {
        line.push_str(" verdicts=disagree");
    }
    line.push('\n');
    line
}

/// Markdown tables for both analyses.
pub fn render_markdown(report: &Report) -> String {
    let freq = &report.frequentist;
    let bayes = &report.bayesian;
    let mut out = String::new();

    // writeln! into a String cannot fail
    let _ = writeln!(out, "# A/B/n Conversion Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Frequentist");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Group | Users | Conversions | Rate |");
    let _ = writeln!(out, "|---|---:|---:|---:|");
    for g in &freq.groups {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {:.2}% |",
            escape_cell(g.group.as_str()),
            g.sample_size,
            g.conversions,
            g.rate * 100.0
        );
    }
    let _ = writeln!(out);

    if freq.comparisons.is_empty() {
        let _ = writeln!(out, "_Only one group; no pairwise comparisons._");
    } else {
        let _ = writeln!(
            out,
            "| Comparison | Rate A | Rate B | z | p-value | Favored | p < {} |",
            freq.significance_level
        );
        let _ = writeln!(out, "|---|---:|---:|---:|---:|---|:---:|");
        for c in &freq.comparisons {
            let _ = writeln!(
                out,
                "| {} | {:.2}% | {:.2}% | {:.3} | {:.4} | {} | {} |",
                escape_cell(&c.label()),
                c.rate_a * 100.0,
                c.rate_b * 100.0,
                c.z_score,
                c.p_value,
                escape_cell(c.favored_group.as_str()),
                if c.significant { "yes" } else { "no" }
            );
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "**Best (observed rate):** {}", freq.best_group);
    let _ = writeln!(out);

    let _ = writeln!(out, "## Bayesian");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Prior Beta({}, {}), {} draws{}.",
        bayes.prior_alpha,
        bayes.prior_beta,
        report.draws,
        match report.seed {
            Some(seed) => format!(", seed {seed}"),
            None => String::new(),
        }
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "| Group | Posterior mean | {:.0}% credible interval | P(best) |",
        bayes.credible_mass * 100.0
    );
    let _ = writeln!(out, "|---|---:|---|---:|");
    for p in &bayes.posteriors {
        let _ = writeln!(
            out,
            "| {} | {:.4} | [{:.4}, {:.4}] | {:.2}% |",
            escape_cell(p.group.as_str()),
            p.posterior_mean,
            p.credible_lower,
            p.credible_upper,
            p.prob_best * 100.0
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "**Best (probability of being best):** {}", bayes.best_group);

    if !report.verdicts_agree() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "> The two analyses disagree on the best group. Consider collecting more data."
        );
    }

    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
