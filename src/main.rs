//! Salon Desk - staff breaks and appointment checkout from the command line.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use salon_desk as app;
use tracing_appender::non_blocking::WorkerGuard;

use app::api::HttpBookingClient;
use app::breaks::{BreakScheduler, ScheduleSettings};
use app::checkout::{CheckoutSettings, CheckoutWizard, CurrencyFormat, DiscountSpec, payment_method_label};
use app::config::{AppConfig, ConfigLoadResult};
use app::models::Appointment;
use app::notice::Notice;
use app::roster::{ANY_STAFF_ID, StaffChoice};

/// Staff break scheduling and appointment checkout.
#[derive(Parser)]
#[command(name = "salon-desk")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long, global = true)]
    dev: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file.
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Schedule a break starting now.
    Break {
        /// Staff id
        #[arg(long)]
        staff: String,
        /// Break length in minutes (5, 10, ... 60)
        #[arg(long)]
        duration: u32,
    },
    /// Complete and invoice an appointment.
    Checkout {
        /// Appointment id
        #[arg(long)]
        appointment: String,
        /// Toggle a service (repeatable). Booked services start selected.
        #[arg(long = "service")]
        services: Vec<String>,
        /// Toggle a product (repeatable)
        #[arg(long = "product")]
        products: Vec<String>,
        /// Staff user id, or "any_staff"
        #[arg(long, default_value = ANY_STAFF_ID)]
        staff: String,
        /// Tip amount
        #[arg(long, default_value = "0")]
        tip: Decimal,
        /// none, percent:<value>, or fixed:<amount>
        #[arg(long, default_value = "none")]
        discount: DiscountSpec,
        /// Payment method (defaults to the first configured one)
        #[arg(long)]
        payment: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = if cli.dev {
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };

    if let Command::InitConfig { force } = cli.command {
        init_logging(None);
        return init_config(&config_path, force);
    }

    let load_result = AppConfig::try_load(&config_path);
    let log_dir = match &load_result {
        ConfigLoadResult::Loaded(config) => config.logging.directory.clone(),
        _ => None,
    };
    let _log_guard = init_logging(log_dir.as_deref());

    tracing::info!("Salon Desk starting...");
    tracing::info!("Config path: {:?}", config_path);

    let config = match load_result {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            config
        }
        ConfigLoadResult::Missing => {
            tracing::warn!("Config missing, using defaults (run `salon-desk init-config` to create one)");
            AppConfig::default()
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::error!("Config invalid: {}", e);
            bail!("invalid config at {}: {e}", config_path.display());
        }
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    let api = Arc::new(HttpBookingClient::from_config(&config.api)?);

    match cli.command {
        Command::Break { staff, duration } => run_break(&rt, api, &config, &staff, duration),
        Command::Checkout {
            appointment,
            services,
            products,
            staff,
            tip,
            discount,
            payment,
        } => run_checkout(
            &rt,
            api,
            &config,
            CheckoutArgs {
                appointment,
                services,
                products,
                staff: StaffChoice::from_id(&staff),
                tip,
                discount,
                payment,
            },
        ),
        Command::InitConfig { .. } => Ok(()),
    }
}

/// Install the stderr subscriber, plus a daily log file when configured.
fn init_logging(directory: Option<&Path>) -> Option<WorkerGuard> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let stderr = fmt::layer().with_writer(std::io::stderr);

    match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "salon-desk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr).init();
            None
        }
    }
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    AppConfig::default()
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("Wrote default config to {:?}", path);
    Ok(())
}

/// Print a notice; error notices fail the command.
fn finish(notice: Option<Notice>, unconfirmed: &str) -> anyhow::Result<()> {
    match notice {
        Some(notice) if notice.is_error() => bail!("{notice}"),
        Some(notice) => {
            println!("{notice}");
            Ok(())
        }
        None => bail!("{unconfirmed}"),
    }
}

fn run_break(
    rt: &tokio::runtime::Runtime,
    api: Arc<HttpBookingClient>,
    config: &AppConfig,
    staff: &str,
    duration: u32,
) -> anyhow::Result<()> {
    let mut picker = BreakScheduler::new(api, rt.handle().clone(), ScheduleSettings::from_config(&config.schedule));

    rt.block_on(async {
        picker.set_staff_id(staff);
        picker.open(Utc::now());
        picker.settle().await;
        if let Some(notice) = picker.take_notice() {
            tracing::warn!("{notice}");
        }

        picker.select_duration(duration)?;
        println!(
            "Break starts at {}, ends at {} ({})",
            picker.start_label(),
            picker.end_label(),
            picker.duration_label()
        );

        if !picker.save() {
            let errors = picker.errors();
            let messages: Vec<&str> = [errors.staff, errors.duration].into_iter().flatten().collect();
            bail!("{}", messages.join(" "));
        }
        picker.settle().await;

        finish(picker.take_notice(), "Break was not confirmed by the server")
    })
}

struct CheckoutArgs {
    appointment: String,
    services: Vec<String>,
    products: Vec<String>,
    staff: StaffChoice,
    tip: Decimal,
    discount: DiscountSpec,
    payment: Option<String>,
}

fn run_checkout(
    rt: &tokio::runtime::Runtime,
    api: Arc<HttpBookingClient>,
    config: &AppConfig,
    args: CheckoutArgs,
) -> anyhow::Result<()> {
    let wizard = CheckoutWizard::new(
        api,
        rt.handle().clone(),
        CheckoutSettings::from_config(&config.checkout),
        CurrencyFormat::new(config.checkout.currency_symbol.clone()),
    );
    let mut wizard = wizard.on_completed(|appt| tracing::info!("Appointment {} marked completed", appt.id));

    rt.block_on(async {
        wizard.open(Appointment::new(args.appointment));
        wizard.settle().await;
        if let Some(notice) = wizard.take_notice() {
            bail!("{notice}");
        }

        for id in &args.services {
            wizard.toggle_service(id);
        }
        wizard.next();

        for id in &args.products {
            wizard.toggle_product(id);
        }
        wizard.next();

        wizard.select_staff(args.staff)?;
        wizard.next();

        wizard.set_tip(args.tip)?;
        wizard.set_discount(args.discount);
        if let Some(method) = &args.payment {
            wizard.set_payment_method(method)?;
        }

        let price = wizard.price();
        println!("{}", wizard.step().label());
        println!("Subtotal: {}", wizard.format_money(price.base));
        println!("Discount: {}", wizard.format_money(price.discount));
        println!("Tip:      {}", wizard.format_money(price.tip));
        println!("Total:    {}", wizard.formatted_total());
        println!("Payment:  {}", payment_method_label(&wizard.state().payment_method));

        wizard.finalize()?;
        wizard.settle().await;

        finish(wizard.take_notice(), "Completion was not confirmed by the server")
    })
}
