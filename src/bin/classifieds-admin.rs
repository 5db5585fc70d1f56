use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use log::debug;

use classifieds_admin::ads::AdStatus;
use classifieds_admin::auth::LoginForm;
use classifieds_admin::categories::{CategoryForm, CategoryTree};
use classifieds_admin::interaction::{AssumeYes, Interaction};
use classifieds_admin::list::{ActionOutcome, ListState};
use classifieds_admin::prelude::*;
use classifieds_admin::reports::ReportStatus;

#[derive(Parser, Debug)]
#[clap(name = "classifieds-admin", version)]
#[clap(about = "Moderate a classified-ads marketplace from the terminal", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Base URL of the admin API
    #[clap(long, env = "ADMIN_API_URL")]
    api_url: String,

    /// File the login token is kept in
    #[clap(long, env = "ADMIN_TOKEN_FILE", default_value = ".classifieds-admin-token.json")]
    token_file: PathBuf,

    /// Answer yes to every confirmation
    #[clap(long, short = 'y')]
    yes: bool,

    /// Reason used for rejections when --yes is given
    #[clap(long, default_value = "Rejected by moderator")]
    reason: String,
}

#[derive(Args, Debug, Clone)]
struct PageArgs {
    /// Free-text search
    #[clap(long, default_value = "")]
    search: String,

    /// Page number
    #[clap(long, default_value = "1")]
    page: u32,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and store the token
    Login {
        #[clap(long)]
        phone: String,
        #[clap(long, env = "ADMIN_PASSWORD")]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show aggregate counters
    Stats,
    /// Moderate user accounts
    #[clap(subcommand)]
    Users(UserCommands),
    /// Moderate ads
    #[clap(subcommand)]
    Ads(AdCommands),
    /// Manage the category tree
    #[clap(subcommand)]
    Categories(CategoryCommands),
    /// Triage abuse reports
    #[clap(subcommand)]
    Reports(ReportCommands),
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    List(PageArgs),
    /// Enable or disable an account
    ToggleActive {
        id: u64,
        #[clap(flatten)]
        page: PageArgs,
    },
    /// Switch an account between admin and user
    ToggleRole {
        id: u64,
        #[clap(flatten)]
        page: PageArgs,
    },
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
enum AdCommands {
    List {
        #[clap(flatten)]
        page: PageArgs,
        /// pending, active, rejected, sold or expired
        #[clap(long)]
        status: Option<String>,
    },
    Show { id: u64 },
    Approve { id: u64 },
    Reject { id: u64 },
    Feature { id: u64 },
    Unfeature { id: u64 },
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
enum CategoryCommands {
    /// Print the tree, fully expanded
    Tree,
    Create {
        title: String,
        #[clap(long, default_value = "")]
        icon: String,
        #[clap(long)]
        parent: Option<u64>,
    },
    Update {
        id: u64,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        icon: Option<String>,
    },
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
enum ReportCommands {
    List {
        /// pending, resolved or all
        #[clap(long, default_value = "pending")]
        status: String,
        #[clap(long, default_value = "1")]
        page: u32,
    },
    Resolve {
        id: u64,
        #[clap(long, default_value = "")]
        notes: String,
    },
    Delete { id: u64 },
    /// Delete the reported ad and close the report
    DeleteAd { id: u64 },
}

/// Asks on the terminal
struct Terminal;

impl Terminal {
    fn read_line(message: &str) -> Option<String> {
        print!("{} ", message);
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl Interaction for Terminal {
    fn confirm(&self, message: &str) -> bool {
        Self::read_line(&format!("{} [y/N]", message))
            .map(|answer| answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
            .unwrap_or(false)
    }

    fn prompt(&self, message: &str) -> Option<String> {
        Self::read_line(message)
    }

    fn alert(&self, message: &str) {
        println!("{}", message);
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let store = Arc::new(FileTokenStore::new(&cli.token_file));
    let admin = AdminClient::new_with_options(&cli.api_url, ClientOptions::default(), store)?;
    let interaction: Arc<dyn Interaction> = if cli.yes {
        Arc::new(AssumeYes::with_answer(&cli.reason))
    } else {
        Arc::new(Terminal)
    };
    debug!("Using API at {}", admin.url);

    match cli.command {
        Commands::Login { phone, password } => {
            let mut form = LoginForm::new(&phone, &password);
            match form.submit(admin.auth()).await {
                Some(route) => println!("Logged in, continue at {}", route),
                None => {
                    return Err(Error::general(form.error.unwrap_or_default()));
                }
            }
        }
        Commands::Logout => {
            admin.auth().logout()?;
            println!("Logged out");
        }
        command => {
            admin.guard().require()?;
            run_protected(&admin, interaction, command).await?;
        }
    }

    Ok(())
}

async fn run_protected(
    admin: &AdminClient,
    interaction: Arc<dyn Interaction>,
    command: Commands,
) -> Result<(), Error> {
    match command {
        Commands::Stats => {
            let stats = admin.stats().fetch().await?;
            println!("Users          {} (+{} today)", stats.total_users, stats.new_users_today);
            println!(
                "Active users   {} ({:.0}%)",
                stats.active_users,
                stats.active_user_ratio()
            );
            println!("Admins/guests  {}/{}", stats.admin_users, stats.guest_users);
            println!("Active ads     {} (+{} today)", stats.active_ads, stats.new_ads_today);
            println!(
                "Pending/rejected/sold ads  {}/{}/{}",
                stats.pending_ads, stats.rejected_ads, stats.sold_ads
            );
            println!("Pending reports {}", stats.pending_reports);
            println!("Active sessions {}", stats.active_sessions);
        }
        Commands::Users(command) => {
            let page = admin.users_page(interaction);
            let view = page.view();
            let (id, args) = match &command {
                UserCommands::List(args) => (None, args.clone()),
                UserCommands::ToggleActive { id, page } | UserCommands::ToggleRole { id, page } => {
                    (Some(*id), page.clone())
                }
                UserCommands::Delete { id } => (Some(*id), PageArgs::default()),
            };
            view.set_search(&args.search);
            view.set_page(args.page);
            view.cancel_pending();
            view.load().await;

            let outcome = match command {
                UserCommands::List(_) => None,
                UserCommands::ToggleActive { .. } => {
                    Some(page.toggle_active(id.unwrap_or_default()).await?)
                }
                UserCommands::ToggleRole { .. } => {
                    Some(page.toggle_role(id.unwrap_or_default()).await?)
                }
                UserCommands::Delete { id } => Some(page.delete(id).await?),
            };
            report_outcome(outcome);
            print_users(&view.snapshot());
        }
        Commands::Ads(command) => {
            let page = admin.ads_page(interaction);
            let outcome = match command {
                AdCommands::List { page: args, status } => {
                    let status = status.as_deref().map(parse_ad_status).transpose()?;
                    let view = page.view();
                    view.set_search(&args.search);
                    page.set_status_filter(status);
                    view.set_page(args.page);
                    view.cancel_pending();
                    view.load().await;
                    print_ads(&view.snapshot());
                    None
                }
                AdCommands::Show { id } => {
                    page.open_detail(id).await?;
                    if let Some(detail) = page.detail() {
                        println!("#{} {} [{}]", detail.id, detail.title, detail.status.label());
                        if let Some(price) = &detail.price {
                            println!("Price: {}", price);
                        }
                        println!("{}", detail.description);
                        for field in &detail.custom_fields {
                            println!("  {}: {}", field.label, field.display_value());
                        }
                        if let Some(days) = detail.featured_days_left(chrono::Utc::now()) {
                            println!("Featured, {} days left", days);
                        }
                    }
                    None
                }
                AdCommands::Approve { id } => {
                    page.open_detail(id).await?;
                    Some(page.approve(id).await?)
                }
                AdCommands::Reject { id } => {
                    page.open_detail(id).await?;
                    Some(page.reject(id).await?)
                }
                AdCommands::Feature { id } => Some(page.feature(id).await?),
                AdCommands::Unfeature { id } => Some(page.unfeature(id).await?),
                AdCommands::Delete { id } => Some(page.delete(id).await?),
            };
            report_outcome(outcome);
        }
        Commands::Categories(command) => {
            let page = admin.categories_page(interaction);
            page.load().await;
            match command {
                CategoryCommands::Tree => {}
                CategoryCommands::Create { title, icon, parent } => {
                    page.open_create(parent);
                    page.set_form(CategoryForm {
                        title,
                        icon,
                        parent_id: parent,
                    });
                    page.submit().await?;
                }
                CategoryCommands::Update { id, title, icon } => {
                    page.open_edit(id)?;
                    if let Some(mut form) = page.modal().map(|modal| modal.form) {
                        if let Some(title) = title {
                            form.title = title;
                        }
                        if let Some(icon) = icon {
                            form.icon = icon;
                        }
                        page.set_form(form);
                    }
                    page.submit().await?;
                }
                CategoryCommands::Delete { id } => {
                    report_outcome(Some(page.delete(id).await?));
                }
            }
            print_tree(page.tree());
        }
        Commands::Reports(command) => {
            let page = admin.reports_page(interaction);
            let (status, number) = match &command {
                ReportCommands::List { status, page } => (parse_report_filter(status)?, *page),
                _ => (None, 1),
            };
            page.set_status_filter(status);
            page.view().set_page(number);
            page.view().cancel_pending();
            page.view().load().await;

            let outcome = match command {
                ReportCommands::List { .. } => None,
                ReportCommands::Resolve { id, notes } => {
                    page.open_resolution(id)?;
                    page.set_notes(&notes);
                    Some(page.submit_resolution().await?)
                }
                ReportCommands::Delete { id } => Some(page.delete_report(id).await?),
                ReportCommands::DeleteAd { id } => Some(page.delete_reported_ad(id).await?),
            };
            report_outcome(outcome);
            for report in page.view().items() {
                println!(
                    "#{} [{}] {} (ad: {})",
                    report.id,
                    report.status,
                    report.text(),
                    report.ad.as_ref().map(|ad| ad.title.as_str()).unwrap_or("-")
                );
            }
        }
        Commands::Login { .. } | Commands::Logout => {}
    }

    Ok(())
}

impl Default for PageArgs {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
        }
    }
}

fn parse_ad_status(value: &str) -> Result<AdStatus, Error> {
    AdStatus::parse(value).ok_or_else(|| Error::general(format!("unknown ad status '{}'", value)))
}

fn parse_report_filter(value: &str) -> Result<Option<ReportStatus>, Error> {
    if value == "all" {
        return Ok(None);
    }
    ReportStatus::parse(value)
        .map(Some)
        .ok_or_else(|| Error::general(format!("unknown report status '{}'", value)))
}

fn report_outcome(outcome: Option<ActionOutcome>) {
    match outcome {
        Some(ActionOutcome::Completed) => println!("Done"),
        Some(ActionOutcome::Cancelled) => println!("Cancelled"),
        Some(ActionOutcome::Busy) => println!("Already running"),
        None => {}
    }
}

fn print_users(state: &ListState<classifieds_admin::users::User>) {
    for user in &state.items {
        println!(
            "#{} {} {} {} {}",
            user.id,
            user.name,
            user.phone.as_deref().unwrap_or("-"),
            user.role,
            if user.is_active { "active" } else { "disabled" }
        );
    }
    println!("Page {}/{} ({} users)", state.query.page, state.total_pages, state.total);
}

fn print_ads(state: &ListState<classifieds_admin::ads::Ad>) {
    for ad in &state.items {
        println!(
            "#{} {} [{}]{}",
            ad.id,
            ad.title,
            ad.status.label(),
            if ad.is_featured { " *" } else { "" }
        );
    }
    println!("Page {}/{} ({} ads)", state.query.page, state.total_pages, state.total);
}

fn print_tree(mut tree: CategoryTree) {
    let ids: Vec<u64> = {
        let mut ids = Vec::new();
        let mut stack: Vec<_> = tree.roots().iter().collect();
        while let Some(node) = stack.pop() {
            ids.push(node.id);
            stack.extend(node.children.iter());
        }
        ids
    };
    for id in ids {
        if !tree.is_expanded(id) {
            tree.toggle(id);
        }
    }
    for node in tree.visible_nodes() {
        let category = node.category;
        println!(
            "{}#{} {}{}",
            "  ".repeat(node.depth),
            category.id,
            category.title,
            if category.is_active { "" } else { " (inactive)" }
        );
    }
}
