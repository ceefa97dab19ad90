use chrono::{Local, Month, NaiveDate};
use clap::{Args, Parser, Subcommand};
use offseason_promo::config::AppConfig;
use offseason_promo::error::AppError;
use offseason_promo::telemetry;
use offseason_promo::workflows::bookings::{parse_month, BookingLoader};
use offseason_promo::workflows::off_season::{detect_off_season, OffSeasonDetection};
use offseason_promo::workflows::promotion::{
    plan_promotions, render_blog, render_email, Notifier, OffSeasonCampaign, PromotionTier,
};
use offseason_promo::workflows::schedule::{
    DailySchedule, DetectionOutcome, Scheduler, SystemClock, YearlyDetection,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "Off-Season Promoter",
    about = "Detect low-activity booking months and launch yearly promotions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the daily scheduler (default command)
    Run(DatasetArgs),
    /// Report off-season months and promotion tiers without sending anything
    Detect(DetectArgs),
    /// Run the yearly detection once, as the scheduler would on the given date
    Trigger(TriggerArgs),
    /// Print the email and blog HTML for a month and percentage drop
    Preview(PreviewArgs),
}

#[derive(Args, Debug, Default)]
struct DatasetArgs {
    /// Override the configured booking dataset path
    #[arg(long)]
    dataset: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DetectArgs {
    #[command(flatten)]
    dataset: DatasetArgs,
    /// Emit the detection as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct TriggerArgs {
    #[command(flatten)]
    dataset: DatasetArgs,
    /// Date to evaluate the trigger against (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Month name, e.g. February
    #[arg(long, value_parser = parse_month_arg)]
    month: Month,
    /// Percentage drop below the overall average
    #[arg(long = "drop", allow_negative_numbers = true)]
    percentage_drop: f64,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Run(DatasetArgs::default()));

    match command {
        Command::Run(args) => {
            apply_dataset_override(&mut config, args);
            run_scheduler(config)
        }
        Command::Detect(args) => {
            apply_dataset_override(&mut config, args.dataset);
            run_detect(&config, args.json)
        }
        Command::Trigger(args) => {
            apply_dataset_override(&mut config, args.dataset);
            run_trigger(config, args.today)
        }
        Command::Preview(args) => {
            run_preview(args);
            Ok(())
        }
    }
}

fn apply_dataset_override(config: &mut AppConfig, args: DatasetArgs) {
    if let Some(path) = args.dataset {
        config.dataset.path = path;
    }
}

fn yearly_detection(config: AppConfig) -> Result<YearlyDetection, AppError> {
    let notifier = Notifier::from_config(&config.notifier)?;
    let campaign = OffSeasonCampaign::new(notifier, config.notifier.recipient);
    Ok(YearlyDetection::new(
        config.dataset.path,
        config.schedule.trigger,
        campaign,
    ))
}

fn run_scheduler(config: AppConfig) -> Result<(), AppError> {
    let schedule = config.schedule.clone();
    let detection = yearly_detection(config)?;

    info!(
        run_at = %schedule.run_at,
        trigger_month = schedule.trigger.month(),
        trigger_day = schedule.trigger.day(),
        dataset = %detection.dataset_path().display(),
        "off-season promoter ready"
    );

    let scheduler = Scheduler::new(
        DailySchedule::new(schedule.run_at),
        schedule.poll_interval,
        SystemClock,
    );
    scheduler.run(|now| match detection.run_for(now.date()) {
        Ok(DetectionOutcome::Skipped { .. }) => {}
        Ok(DetectionOutcome::Completed { report, .. }) => {
            info!(
                promotions = report.dispatched.len(),
                "yearly detection finished"
            );
        }
        Err(err) => {
            error!(
                error = %err,
                "yearly detection failed; next attempt on the following trigger date"
            );
        }
    });

    Ok(())
}

fn run_detect(config: &AppConfig, json: bool) -> Result<(), AppError> {
    let records = BookingLoader::from_path(&config.dataset.path)?;
    let detection = detect_off_season(&records)?;

    if json {
        let rendered = serde_json::to_string_pretty(&detection.view())
            .map_err(|err| AppError::Io(err.into()))?;
        println!("{rendered}");
    } else {
        println!(
            "Off-season detection for {} ({} bookings)",
            config.dataset.path.display(),
            records.len()
        );
        render_detection(&detection);
    }

    Ok(())
}

fn run_trigger(config: AppConfig, today: Option<NaiveDate>) -> Result<(), AppError> {
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let detection = yearly_detection(config)?;

    match detection.run_for(today)? {
        DetectionOutcome::Skipped { today } => {
            println!("Skipped: {today} is not the configured trigger date.");
        }
        DetectionOutcome::Completed { detection, report } => {
            render_detection(&detection);
            println!("Dispatched {} promotion(s):", report.dispatched.len());
            for dispatch in &report.dispatched {
                match &dispatch.blog_link {
                    Some(link) => println!(
                        "  - {}: {} ({})",
                        dispatch.month.name(),
                        dispatch.tier,
                        link
                    ),
                    None => println!("  - {}: {}", dispatch.month.name(), dispatch.tier),
                }
            }
        }
    }

    Ok(())
}

fn run_preview(args: PreviewArgs) {
    let tier = PromotionTier::classify(args.percentage_drop);
    let month = args.month.name();
    println!("Tier: {tier}");
    println!("\n-- email --");
    print!("{}", render_email(month, args.percentage_drop, tier));
    println!("\n-- blog --");
    print!("{}", render_blog(month, args.percentage_drop, tier));
}

fn render_detection(detection: &OffSeasonDetection) {
    println!(
        "Overall monthly cancellation average: {:.4}",
        detection.overall_average
    );
    println!("Monthly averages:");
    for stat in &detection.monthly {
        println!(
            "  - {:<9} {:.4} ({} bookings)",
            stat.month.name(),
            stat.mean_cancellation,
            stat.bookings
        );
    }

    let plans = plan_promotions(detection);
    if plans.is_empty() {
        println!("No off-season months detected.");
        return;
    }
    println!("Off-season months:");
    for plan in plans {
        println!(
            "  - {}: {:.2}% below average -> {}",
            plan.month.name(),
            plan.percentage_drop,
            plan.tier
        );
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_month_arg(raw: &str) -> Result<Month, String> {
    parse_month(raw).ok_or_else(|| format!("'{raw}' is not a month name"))
}
