//! DealVista command-line front end
//!
//! Thin driver over the engine: one `AppContext` per invocation, restored
//! from the session cookie, torn down (or re-persisted) on exit.

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dealvista_core::{CatalogQuery, DiscountType, NewCoupon, SortBy};
use dealvista_engine::{AppConfig, AppContext};

#[derive(Parser, Debug)]
#[command(name = "dealvista")]
#[command(author, version, about = "Browse, list, and redeem coupons with reward points")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session cookie
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the stored session
    Logout,
    /// Browse coupon listings
    Browse {
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Discount type ("Flat Discount", "Percentage", "Cashback", "BOGO")
        #[arg(long = "type")]
        discount_type: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// Sort mode ("Latest", "Expiring Soon", "Most Popular")
        #[arg(long, default_value = "Latest")]
        sort: String,
        /// Include listings the server no longer marks verified
        #[arg(long)]
        all: bool,
        #[arg(long, default_value_t = 0)]
        page: i64,
    },
    /// Show one coupon's details
    Show { coupon_id: String },
    /// Pay points to reveal a coupon's code
    Reveal {
        coupon_id: String,
        /// Confirm the deduction without prompting
        #[arg(long)]
        yes: bool,
    },
    /// Show profile and stats
    Profile,
    /// Show recent activity
    Logs,
    /// List a new coupon
    List {
        #[arg(long)]
        title: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        platform: String,
        #[arg(long)]
        category: String,
        /// Discount type ("Flat Discount", "Percentage", "Cashback", "BOGO")
        #[arg(long = "type")]
        discount_type: String,
        #[arg(long)]
        value: Option<f64>,
        #[arg(long)]
        quantity: u32,
        #[arg(long)]
        valid_till: Option<chrono::NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env();
    let mut ctx = AppContext::new(&config);
    ctx.init().context("Failed to read the session cookie")?;

    match args.command {
        Command::Login { email, password } => {
            let session = ctx.login(&email, &password).await?;
            println!(
                "Logged in as {} ({})",
                session.display_name, session.points_balance
            );
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            let session = ctx.signup(&name, &email, &password).await?;
            println!(
                "Welcome, {}! Starting balance: {}",
                session.display_name, session.points_balance
            );
        }
        Command::Logout => {
            ctx.logout();
            println!("Logged out");
        }
        Command::Browse {
            platform,
            category,
            discount_type,
            search,
            sort,
            all,
            page,
        } => {
            let sort_by = SortBy::from_label(&sort)
                .ok_or_else(|| anyhow::anyhow!("Unknown sort mode: {sort}"))?;
            let discount_type = match discount_type {
                Some(label) => Some(
                    DiscountType::from_label(&label)
                        .ok_or_else(|| anyhow::anyhow!("Unknown discount type: {label}"))?,
                ),
                None => None,
            };

            ctx.set_verified_only(!all);
            ctx.search(CatalogQuery {
                platform,
                category,
                discount_type,
                search,
                sort_by,
                ..Default::default()
            })
            .await?;
            if page > 0 {
                ctx.go_to_page(page).await?;
            }
            print_listing(&ctx);
        }
        Command::Show { coupon_id } => {
            let detail = ctx.open_coupon(&coupon_id).await?;
            let c = &detail.coupon;
            println!("{} — {} / {}", c.title, c.platform, c.category);
            if let Some(desc) = &c.description {
                println!("  {desc}");
            }
            if let Some(till) = c.valid_till {
                println!("  Valid till {till}");
            }
            println!("  Reveal cost: {}", c.redeem_cost());
            println!("  Redeemed by {} users", c.sold_quantity);
        }
        Command::Reveal { coupon_id, yes } => {
            let detail = ctx.open_coupon(&coupon_id).await?;
            ctx.request_reveal();

            if !yes {
                ctx.cancel_reveal();
                bail!(
                    "Revealing '{}' costs {}. Re-run with --yes to confirm.",
                    detail.coupon.title,
                    detail.coupon.redeem_cost()
                );
            }

            let code = ctx.confirm_reveal().await?;
            println!("Code: {code}");
            if let Some(session) = ctx.session() {
                println!("Remaining balance: {}", session.points_balance);
            }
        }
        Command::Profile => {
            let profile = ctx.profile().await?;
            let stats = ctx.stats().await?;
            println!("{} <{}>", profile.full_name, profile.email);
            println!(
                "  {} listed, {} redeemed, {} pts (earned {}, spent {})",
                stats.coupons_added,
                stats.coupons_redeemed,
                stats.current_points,
                stats.total_points_earned,
                stats.total_points_spent
            );
        }
        Command::Logs => {
            for entry in ctx.logs().await? {
                match entry.created_at {
                    Some(at) => println!("{}  {}", at.format("%Y-%m-%d %H:%M"), entry.message),
                    None => println!("{}", entry.message),
                }
            }
        }
        Command::List {
            title,
            code,
            platform,
            category,
            discount_type,
            value,
            quantity,
            valid_till,
        } => {
            let discount_type = DiscountType::from_label(&discount_type)
                .ok_or_else(|| anyhow::anyhow!("Unknown discount type: {discount_type}"))?;
            let created = ctx
                .list_coupon(&NewCoupon {
                    title,
                    description: None,
                    code,
                    platform,
                    category,
                    discount_type,
                    discount_value: value,
                    min_order_value: None,
                    max_discount_value: None,
                    valid_from: None,
                    valid_till,
                    terms_conditions: None,
                    total_quantity: quantity,
                    redeem_cost: None,
                })
                .await?;
            println!("Listed '{}' ({})", created.coupon.title, created.coupon.id);
        }
    }

    Ok(())
}

fn print_listing(ctx: &AppContext) {
    let page = ctx.browse().page();
    let coupons = ctx.browse().refined();

    if coupons.is_empty() {
        println!("No coupons found matching your filters.");
        return;
    }

    for c in &coupons {
        let validity = c
            .valid_till
            .map(|d| format!("valid till {d}"))
            .unwrap_or_else(|| "check terms".to_string());
        println!(
            "{}  {} — {} / {} ({}, {} redeemed, {})",
            c.id,
            c.title,
            c.platform,
            c.category,
            validity,
            c.sold_quantity,
            c.redeem_cost()
        );
    }

    println!(
        "Page {} of {} ({} coupons total){}",
        page.current_page + 1,
        page.total_pages,
        page.total_items,
        if page.has_next { " — more with --page" } else { "" }
    );
}
