use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::config::Settings;
use crate::core::{
    GrowthTrend, MacroSnapshot, ScenarioTag, classify, project, required_monthly_contribution,
    template_for_tier, time_to_reach_goal,
};

use super::{MAX_PROJECTION_YEARS, run_http_server};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliGrowthTrend {
    Expansion,
    Contraction,
    Stable,
}

impl From<CliGrowthTrend> for GrowthTrend {
    fn from(value: CliGrowthTrend) -> Self {
        match value {
            CliGrowthTrend::Expansion => GrowthTrend::Expansion,
            CliGrowthTrend::Contraction => GrowthTrend::Contraction,
            CliGrowthTrend::Stable => GrowthTrend::Stable,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "advisor",
    about = "Asset allocation, growth projection and market scenario engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP
    Serve {
        #[arg(long, help = "Overrides ADVISOR_PORT")]
        port: Option<u16>,
    },
    /// Print the recommended allocation for a risk tier
    Template {
        #[arg(default_value = "moderate", help = "conservative, moderate or aggressive")]
        tier: String,
    },
    /// Compound a principal forward year by year
    Project {
        #[arg(long)]
        principal: f64,
        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Annual return in percent, e.g. 8"
        )]
        annual_return: f64,
        #[arg(long, default_value_t = 10)]
        years: u32,
    },
    /// Level monthly deposit needed to reach a savings target in time
    GoalContribution {
        #[arg(long, default_value_t = 0.0)]
        principal: f64,
        #[arg(long, allow_negative_numbers = true)]
        annual_return: f64,
        #[arg(long)]
        years: u32,
        #[arg(long)]
        target: f64,
    },
    /// Months needed to reach a savings target
    GoalHorizon {
        #[arg(long, default_value_t = 0.0)]
        principal: f64,
        #[arg(long)]
        monthly_contribution: f64,
        #[arg(long, allow_negative_numbers = true)]
        annual_return: f64,
        #[arg(long)]
        target: f64,
    },
    /// Classify macroeconomic indicators into a market scenario
    Classify {
        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Trailing 12-month inflation in percent"
        )]
        inflation: f64,
        #[arg(
            long,
            allow_negative_numbers = true,
            help = "GDP growth forecast for the year in percent"
        )]
        gdp_forecast: f64,
        #[arg(
            long,
            allow_negative_numbers = true,
            help = "GDP growth in the last quarter in percent"
        )]
        gdp_last_quarter: f64,
        #[arg(long, help = "Current policy interest rate in percent")]
        policy_rate: f64,
        #[arg(long, allow_negative_numbers = true, help = "Currency variation in percent")]
        currency_variation: f64,
        #[arg(long, value_enum, default_value_t = CliGrowthTrend::Stable)]
        trend: CliGrowthTrend,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContributionReport {
    monthly_contribution: Option<f64>,
    reachable: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioReport {
    scenario: ScenarioTag,
    label: &'static str,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve { port } => {
            let settings = Settings::from_env()?.with_port(port);
            run_http_server(settings)
                .await
                .context("HTTP server stopped with an error")
        }
        command => {
            println!("{}", render_report(&command)?);
            Ok(())
        }
    }
}

/// Pretty JSON for every subcommand except `serve`.
pub fn render_report(command: &Command) -> anyhow::Result<String> {
    let value = match command {
        Command::Serve { .. } => anyhow::bail!("serve does not produce a report"),
        Command::Template { tier } => serde_json::to_value(template_for_tier(tier))?,
        Command::Project {
            principal,
            annual_return,
            years,
        } => {
            if *years > MAX_PROJECTION_YEARS {
                anyhow::bail!("--years must be <= {MAX_PROJECTION_YEARS}");
            }
            serde_json::to_value(project(*principal, *annual_return, *years))?
        }
        Command::GoalContribution {
            principal,
            annual_return,
            years,
            target,
        } => {
            if *years > MAX_PROJECTION_YEARS {
                anyhow::bail!("--years must be <= {MAX_PROJECTION_YEARS}");
            }
            let monthly_contribution =
                required_monthly_contribution(*principal, *annual_return, *years, *target);
            serde_json::to_value(ContributionReport {
                reachable: monthly_contribution.is_some(),
                monthly_contribution,
            })?
        }
        Command::GoalHorizon {
            principal,
            monthly_contribution,
            annual_return,
            target,
        } => serde_json::to_value(time_to_reach_goal(
            *principal,
            *monthly_contribution,
            *annual_return,
            *target,
        ))?,
        Command::Classify {
            inflation,
            gdp_forecast,
            gdp_last_quarter,
            policy_rate,
            currency_variation,
            trend,
        } => {
            let snapshot = MacroSnapshot {
                inflation_rate_trailing_12m: *inflation,
                gdp_annual_forecast: *gdp_forecast,
                gdp_last_quarter: *gdp_last_quarter,
                policy_rate_current: *policy_rate,
                currency_variation_pct: *currency_variation,
                growth_trend_indicator: (*trend).into(),
            };
            let scenario = classify(Some(&snapshot));
            serde_json::to_value(ScenarioReport {
                scenario,
                label: scenario.label(),
            })?
        }
    };

    serde_json::to_string_pretty(&value).context("failed to render report")
}
