use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use pp_barcelos::{
    client::{Endpoint, WebhookConfig},
    constants::DEFAULT_HOMEPAGE_TESTIMONIALS,
    forms::{ContactForm, Form, FranchiseForm},
    locations::{
        nearest_to, sorted_by, Coordinates, Feature, Location, LocationFilters, LocationSort,
    },
    menu::{format_price, HeatLevel, MenuItem},
    session::FormSession,
    testimonials::{Rating, Testimonial, TestimonialSource},
    Region, SiteData, WebhookClient,
};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "periperi", about = "Query Barcelos site content and send enquiries")]
struct CliArgs {
    #[command(subcommand)]
    pub subcommand: Command,

    #[command(flatten)]
    pub global_opts: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    #[arg(short = 'd', long, global = true, help = "Site data file (default: built-in data)")]
    pub data: Option<PathBuf>,

    #[arg(
        short = 'r',
        long,
        global = true,
        env = "PERIPERI_REGION",
        default_value = "india"
    )]
    pub region: Region,

    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[clap(about = "List restaurant locations")]
    Locations(LocationOpts),

    #[clap(about = "Show one location")]
    Location { id: String },

    #[clap(about = "List menu categories in display order")]
    Categories,

    #[clap(about = "List menu items")]
    Menu(MenuOpts),

    #[clap(about = "List customer testimonials")]
    Testimonials(TestimonialOpts),

    #[clap(about = "Send a contact enquiry")]
    Contact(ContactOpts),

    #[clap(about = "Send a franchise enquiry")]
    Franchise(FranchiseOpts),

    #[clap(about = "Write the site data as JSON")]
    Export {
        #[arg(short = 'o', long, help = "Output file")]
        output_path: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct LocationOpts {
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long = "feature", help = "Required feature, may be repeated")]
    pub features: Vec<Feature>,
    #[arg(long)]
    pub featured: bool,
    #[arg(long, help = "Include inactive locations")]
    pub all: bool,
    #[arg(long)]
    pub sort: Option<LocationSort>,
    #[arg(long, value_name = "LAT,LNG", help = "Only the nearest matching location")]
    pub near: Option<Coordinates>,
}

#[derive(Args, Debug)]
struct MenuOpts {
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub veg: bool,
    #[arg(long)]
    pub popular: bool,
    #[arg(long = "new")]
    pub new_only: bool,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub heat: Option<u8>,
    #[arg(long)]
    pub min_price: Option<u32>,
    #[arg(long)]
    pub max_price: Option<u32>,
}

#[derive(Args, Debug)]
struct TestimonialOpts {
    #[arg(long, value_name = "LIMIT", help = "Homepage selection, featured first")]
    pub homepage: Option<Option<usize>>,
    #[arg(long, conflicts_with = "homepage")]
    pub recent: Option<usize>,
    #[arg(long)]
    pub source: Option<TestimonialSource>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(4..=5))]
    pub rating: Option<u8>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub featured: bool,
    #[arg(long)]
    pub verified: bool,
    #[arg(long, help = "Print summary statistics instead of reviews")]
    pub stats: bool,
}

#[derive(Args, Debug)]
struct ContactOpts {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub message: String,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long, env = "PERIPERI_CONTACT_WEBHOOK")]
    pub webhook_url: Option<String>,
}

#[derive(Args, Debug)]
struct FranchiseOpts {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long = "franchise-region", help = "Province or state, or `international`")]
    pub franchise_region: String,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long, default_value = "")]
    pub investment: String,
    #[arg(long, default_value = "")]
    pub experience: String,
    #[arg(long, default_value = "")]
    pub message: String,
    #[arg(long)]
    pub turnstile_token: Option<String>,
    #[arg(long, help = "Refuse to send without a verification token")]
    pub require_verification: bool,
    #[arg(long, env = "PERIPERI_FRANCHISE_WEBHOOK")]
    pub webhook_url: Option<String>,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "periperi=debug,pp_barcelos=debug"
    } else {
        "periperi=info,pp_barcelos=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_data(path: Option<&Path>) -> Result<SiteData> {
    let data = match path {
        Some(path) => SiteData::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => SiteData::embedded()?,
    };
    Ok(data)
}

fn location_json(location: &Location) -> Value {
    let mut value = json!(location);
    value["cityState"] = json!(location.city_state());
    value["phoneVerified"] = json!(location.is_phone_verified());
    value["directionsUrl"] = json!(location.directions_url());
    value
}

fn item_json(item: &MenuItem, region: Region) -> Value {
    let mut value = json!(item);
    value["displayPrice"] = json!(format_price(item.price, region));
    if let Some(level) = item.heat_level {
        value["heatLabel"] = json!(level.label());
    }
    value
}

fn testimonial_json(testimonial: &Testimonial) -> Value {
    let mut value = json!(testimonial);
    value["displayDate"] = json!(testimonial.display_date());
    value["sourceInfo"] = json!(testimonial.source.info());
    value
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn submit<F: Form>(form: F, client: &WebhookClient) -> Result<()> {
    let mut session = FormSession::new(form);
    match session.submit(client).await {
        Ok(receipt) => print_json(&json!(receipt)),
        Err(err) => {
            print_json(&json!(session.state()))?;
            Err(err.into())
        }
    }
}

fn webhook_config(url: Option<&str>) -> Result<Option<Endpoint>> {
    Ok(url.map(Endpoint::try_new).transpose()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.global_opts.verbose);
    let region = args.global_opts.region;
    let data = load_data(args.global_opts.data.as_deref()).await?;

    match args.subcommand {
        Command::Locations(opts) => {
            let filters = LocationFilters {
                city: opts.city,
                state: opts.state,
                features: opts.features,
                is_active: (!opts.all).then_some(true),
            };
            let mut locations = data.locations().filter(&filters);
            if opts.featured {
                locations.retain(|loc| loc.is_featured);
            }
            if let Some(sort) = opts.sort {
                locations = sorted_by(&locations, sort);
            }
            if let Some(origin) = opts.near {
                let output = match nearest_to(&locations, &origin) {
                    Some((loc, distance)) => {
                        let mut value = location_json(loc);
                        value["distanceKm"] = json!((distance * 10.0).round() / 10.0);
                        value
                    }
                    None => Value::Null,
                };
                return print_json(&output);
            }
            print_json(&Value::Array(locations.into_iter().map(location_json).collect()))?;
        }
        Command::Location { id } => {
            let Some(location) = data.locations().by_id(&id) else {
                bail!("no location with id `{id}`");
            };
            print_json(&location_json(location))?;
        }
        Command::Categories => {
            let categories: Vec<Value> = data
                .menu()
                .categories()
                .into_iter()
                .map(|category| {
                    json!({
                        "id": category.id,
                        "name": category.name,
                        "description": category.description,
                        "order": category.order,
                        "itemCount": category.items.len(),
                    })
                })
                .collect();
            print_json(&Value::Array(categories))?;
        }
        Command::Menu(opts) => {
            let menu = data.menu();
            let mut items = match opts.category.as_deref() {
                Some(id) => menu.items_in(id),
                None => menu.items(),
            };
            if let Some(query) = opts.search.as_deref() {
                let hits = menu.search(query);
                items.retain(|item| hits.iter().any(|hit| std::ptr::eq(*hit, *item)));
            }
            if opts.veg {
                items.retain(|item| item.is_veg);
            }
            if opts.popular {
                items.retain(|item| item.is_popular);
            }
            if opts.new_only {
                items.retain(|item| item.is_new);
            }
            if let Some(level) = opts.heat {
                let level = HeatLevel::try_from(level)?;
                items.retain(|item| item.heat_level == Some(level));
            }
            if opts.min_price.is_some() || opts.max_price.is_some() {
                let in_range = menu.by_price_range(
                    opts.min_price.unwrap_or(0),
                    opts.max_price.unwrap_or(u32::MAX),
                );
                items.retain(|item| in_range.iter().any(|hit| std::ptr::eq(*hit, *item)));
            }
            print_json(&Value::Array(
                items.into_iter().map(|item| item_json(item, region)).collect(),
            ))?;
        }
        Command::Testimonials(opts) => {
            let testimonials = data.testimonials();
            if opts.stats {
                return print_json(&json!({
                    "count": testimonials.len(),
                    "averageRating": testimonials.average_rating(),
                    "bySource": testimonials.count_by_source(),
                }));
            }
            let mut selected = match (opts.homepage, opts.recent) {
                (Some(limit), _) => {
                    testimonials.homepage(limit.unwrap_or(DEFAULT_HOMEPAGE_TESTIMONIALS))
                }
                (None, Some(limit)) => testimonials.recent(Some(limit)),
                (None, None) => testimonials.all().iter().collect(),
            };
            if let Some(source) = opts.source {
                selected.retain(|t| t.source == source);
            }
            if let Some(rating) = opts.rating {
                let rating = Rating::try_from(rating)?;
                selected.retain(|t| t.rating == rating);
            }
            if let Some(location) = opts.location.as_deref() {
                selected.retain(|t| t.location.eq_ignore_ascii_case(location));
            }
            if opts.featured {
                selected.retain(|t| t.is_featured);
            }
            if opts.verified {
                selected.retain(|t| t.verified);
            }
            print_json(&Value::Array(
                selected.into_iter().map(testimonial_json).collect(),
            ))?;
        }
        Command::Contact(opts) => {
            let config = WebhookConfig {
                contact: webhook_config(opts.webhook_url.as_deref())?,
                ..Default::default()
            };
            let client = WebhookClient::new(pp_barcelos::default_http_client()?, region, config);
            info!(url = %client.endpoint_url(ContactForm::FORM_TYPE), "sending contact enquiry");
            let form = ContactForm {
                name: opts.name,
                email: opts.email,
                subject: opts.subject,
                phone: opts.phone,
                message: opts.message,
            };
            submit(form, &client).await?;
        }
        Command::Franchise(opts) => {
            let config = WebhookConfig {
                franchise: webhook_config(opts.webhook_url.as_deref())?,
                require_verification: opts.require_verification,
                ..Default::default()
            };
            let client = WebhookClient::new(pp_barcelos::default_http_client()?, region, config);
            info!(url = %client.endpoint_url(FranchiseForm::FORM_TYPE), "sending franchise enquiry");
            let form = FranchiseForm {
                name: opts.name,
                email: opts.email,
                phone: opts.phone,
                region: opts.franchise_region,
                country: opts.country,
                investment: opts.investment,
                experience: opts.experience,
                message: opts.message,
                turnstile_token: opts.turnstile_token,
            };
            submit(form, &client).await?;
        }
        Command::Export { output_path } => match output_path {
            Some(path) => data.save(&path).await?,
            None => print_json(&json!(data))?,
        },
    }

    Ok(())
}
