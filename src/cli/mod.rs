//! `places` command-line interface.
//!
//! [`run`] parses arguments, builds a [`Client`] and writes either rendered
//! text or pretty JSON. Usage problems (bad flags, invalid input, missing API
//! key) exit with 2; everything else that fails exits with 1.

pub mod color;
pub mod render;

use std::ffi::OsString;
use std::io::Write;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::client::{
    Client, ClientConfig, DEFAULT_AUTOCOMPLETE_LIMIT, DEFAULT_BASE_URL, DEFAULT_NEARBY_LIMIT,
    DEFAULT_RESOLVE_LIMIT, DEFAULT_ROUTES_BASE_URL, DEFAULT_SEARCH_LIMIT, DEFAULT_TIMEOUT_SECS,
};
use crate::error::{Error, ValidationError};
use crate::route::{
    DEFAULT_ROUTE_LIMIT, DEFAULT_ROUTE_RADIUS_M, DEFAULT_ROUTE_WAYPOINTS, RouteRequest, TravelMode,
};
use crate::types::{
    AutocompleteRequest, DetailsRequest, Filters, Locale, LocationBias, LocationResolveRequest,
    NearbySearchRequest, PhotoMediaRequest, SearchRequest,
};
use color::{Color, color_enabled};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// Google Places search from the terminal
#[derive(Debug, Parser)]
#[command(name = "places")]
#[command(version, about = "Search places, nearby spots and places along a route", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// Google Places API key
    #[arg(long, env = "GOOGLE_PLACES_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Places API base URL
    #[arg(long, env = "GOOGLE_PLACES_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Routes API base URL
    #[arg(long, env = "GOOGLE_ROUTES_BASE_URL", default_value = DEFAULT_ROUTES_BASE_URL, global = true)]
    pub routes_base_url: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Text search for places
    Search {
        /// Free-form query, e.g. "coffee in Seattle"
        query: String,

        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,

        /// Token from a previous page
        #[arg(long)]
        page_token: Option<String>,

        /// Extra keyword appended to the query
        #[arg(long)]
        keyword: Option<String>,

        /// Place type filter (only the first is sent)
        #[arg(long = "type")]
        types: Vec<String>,

        /// Only places open now
        #[arg(long)]
        open_now: bool,

        #[arg(long)]
        min_rating: Option<f64>,

        /// Price tier 0-4, repeatable
        #[arg(long = "price-level")]
        price_levels: Vec<u8>,

        #[command(flatten)]
        locale: LocaleArgs,

        #[command(flatten)]
        bias: BiasArgs,
    },

    /// Suggestions for partial input
    Autocomplete {
        input: String,

        #[arg(long, default_value_t = DEFAULT_AUTOCOMPLETE_LIMIT)]
        limit: u32,

        #[arg(long)]
        session_token: Option<String>,

        #[command(flatten)]
        locale: LocaleArgs,

        #[command(flatten)]
        bias: BiasArgs,
    },

    /// Places inside a circle
    Nearby {
        #[arg(long, default_value_t = DEFAULT_NEARBY_LIMIT)]
        limit: u32,

        /// Included place type, repeatable
        #[arg(long = "type")]
        included_types: Vec<String>,

        /// Excluded place type, repeatable
        #[arg(long = "exclude-type")]
        excluded_types: Vec<String>,

        #[command(flatten)]
        locale: LocaleArgs,

        #[command(flatten)]
        area: BiasArgs,
    },

    /// Places along the route between two locations
    Route {
        /// What to look for at each waypoint
        query: String,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// DRIVE, WALK, BICYCLE, TWO_WHEELER or TRANSIT
        #[arg(long, default_value_t = TravelMode::Drive.to_string())]
        mode: String,

        /// Search radius around each waypoint
        #[arg(long = "radius-m", default_value_t = DEFAULT_ROUTE_RADIUS_M)]
        radius_m: f64,

        #[arg(long, default_value_t = DEFAULT_ROUTE_WAYPOINTS)]
        max_waypoints: usize,

        /// Results per waypoint
        #[arg(long, default_value_t = DEFAULT_ROUTE_LIMIT)]
        limit: u32,

        #[command(flatten)]
        locale: LocaleArgs,
    },

    /// Details for one place
    Details {
        place_id: String,

        /// Include reviews
        #[arg(long)]
        reviews: bool,

        /// Include photo references
        #[arg(long)]
        photos: bool,

        #[command(flatten)]
        locale: LocaleArgs,
    },

    /// Media URL for a photo resource name
    Photo {
        /// places/<place_id>/photos/<photo_ref>
        name: String,

        #[arg(long)]
        max_width: Option<u32>,

        #[arg(long)]
        max_height: Option<u32>,
    },

    /// Candidate places for a location string
    Resolve {
        location: String,

        #[arg(long, default_value_t = DEFAULT_RESOLVE_LIMIT)]
        limit: u32,

        #[command(flatten)]
        locale: LocaleArgs,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct LocaleArgs {
    /// BCP-47 language code, e.g. "en"
    #[arg(long)]
    pub language: Option<String>,

    /// CLDR region code, e.g. "US"
    #[arg(long)]
    pub region: Option<String>,
}

impl From<LocaleArgs> for Locale {
    fn from(args: LocaleArgs) -> Self {
        Locale::new(args.language.as_deref(), args.region.as_deref())
    }
}

/// Circle given as `--lat`, `--lng` and `--radius-m`.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct BiasArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,

    #[arg(long = "radius-m")]
    pub radius_m: Option<f64>,
}

impl BiasArgs {
    /// `None` when no flag is set; all three flags are needed otherwise.
    pub fn into_circle(self, field: &'static str) -> Result<Option<LocationBias>, ValidationError> {
        match (self.lat, self.lng, self.radius_m) {
            (None, None, None) => Ok(None),
            (Some(lat), Some(lng), Some(radius_m)) => Ok(Some(LocationBias { lat, lng, radius_m })),
            _ => Err(ValidationError::new(field, "lat, lng, radius required")),
        }
    }
}

/// Parses `args`, runs the command and returns the process exit code.
pub fn run<I, T>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(parse_err) => {
            let sink: &mut dyn Write = if parse_err.use_stderr() { err } else { out };
            let _ = write!(sink, "{}", parse_err);
            return u8::try_from(parse_err.exit_code()).unwrap_or(EXIT_USAGE);
        }
    };

    init_tracing(cli.global.verbose);

    match execute(cli, out, err) {
        Ok(()) => EXIT_OK,
        Err(e) => handle_error(&e, err),
    }
}

/// Maps verbosity count to a log filter.
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(verbose)));

    // A subscriber may already be installed when run more than once in-process.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn execute(cli: Cli, out: &mut dyn Write, err: &mut dyn Write) -> anyhow::Result<()> {
    let global = cli.global;
    let color = Color::new(!global.json && color_enabled(global.no_color));
    let client = Client::new(ClientConfig {
        api_key: global.api_key.unwrap_or_default(),
        base_url: global.base_url,
        routes_base_url: global.routes_base_url,
        timeout_secs: global.timeout,
    })?;

    match cli.command {
        Command::Search {
            query,
            limit,
            page_token,
            keyword,
            types,
            open_now,
            min_rating,
            price_levels,
            locale,
            bias,
        } => {
            let filters = Filters {
                keyword,
                types,
                open_now: open_now.then_some(true),
                min_rating,
                price_levels,
            };
            let request = SearchRequest {
                query,
                filters: (!filters.is_empty()).then_some(filters),
                location_bias: bias.into_circle("location_bias")?,
                limit: Some(limit),
                page_token,
                locale: locale.into(),
            };
            let response = client.search(request)?;
            if global.json {
                write_json(out, &response)?;
                if let Some(token) = &response.next_page_token {
                    writeln!(err, "next page token: {}", token)?;
                }
                return Ok(());
            }
            write_text(out, &render::render_search(color, &response))
        }

        Command::Autocomplete {
            input,
            limit,
            session_token,
            locale,
            bias,
        } => {
            let request = AutocompleteRequest {
                input,
                session_token,
                limit: Some(limit),
                locale: locale.into(),
                location_bias: bias.into_circle("location_bias")?,
            };
            let response = client.autocomplete(request)?;
            if global.json {
                return write_json(out, &response);
            }
            write_text(out, &render::render_autocomplete(color, &response))
        }

        Command::Nearby {
            limit,
            included_types,
            excluded_types,
            locale,
            area,
        } => {
            let request = NearbySearchRequest {
                location_restriction: area.into_circle("location_restriction")?,
                limit: Some(limit),
                included_types,
                excluded_types,
                locale: locale.into(),
            };
            let response = client.nearby_search(request)?;
            if global.json {
                return write_json(out, &response);
            }
            write_text(out, &render::render_nearby(color, &response))
        }

        Command::Route {
            query,
            from,
            to,
            mode,
            radius_m,
            max_waypoints,
            limit,
            locale,
        } => {
            let request = RouteRequest {
                query,
                from,
                to,
                mode: Some(mode),
                radius_m: Some(radius_m),
                max_waypoints: Some(max_waypoints),
                limit: Some(limit),
                locale: locale.into(),
            };
            let response = client.route(request)?;
            debug!(waypoints = response.waypoints.len(), "route search finished");
            if global.json {
                return write_json(out, &response);
            }
            write_text(out, &render::render_route(color, &response))
        }

        Command::Details {
            place_id,
            reviews,
            photos,
            locale,
        } => {
            let request = DetailsRequest {
                place_id,
                locale: locale.into(),
                include_reviews: reviews,
                include_photos: photos,
            };
            let place = client.details(request)?;
            if global.json {
                return write_json(out, &place);
            }
            write_text(out, &render::render_details(color, &place))
        }

        Command::Photo {
            name,
            max_width,
            max_height,
        } => {
            let request = PhotoMediaRequest {
                name,
                max_width_px: max_width,
                max_height_px: max_height,
            };
            let photo = client.photo_media(request)?;
            if global.json {
                return write_json(out, &photo);
            }
            write_text(out, &render::render_photo(color, &photo))
        }

        Command::Resolve {
            location,
            limit,
            locale,
        } => {
            let request = LocationResolveRequest {
                location_text: location,
                limit: Some(limit),
                locale: locale.into(),
            };
            let response = client.resolve(request)?;
            if global.json {
                return write_json(out, &response);
            }
            write_text(out, &render::render_resolve(color, &response))
        }
    }
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("write json output")?;
    writeln!(out).context("write json output")?;
    Ok(())
}

fn write_text(out: &mut dyn Write, text: &str) -> anyhow::Result<()> {
    writeln!(out, "{}", text.trim_end_matches('\n')).context("write output")?;
    Ok(())
}

fn handle_error(error: &anyhow::Error, err: &mut dyn Write) -> u8 {
    let _ = writeln!(err, "error: {:#}", error);
    exit_code_for(error)
}

fn exit_code_for(error: &anyhow::Error) -> u8 {
    if let Some(e) = error.downcast_ref::<Error>() {
        return if e.is_usage() { EXIT_USAGE } else { EXIT_FAILURE };
    }
    if error.downcast_ref::<ValidationError>().is_some() {
        return EXIT_USAGE;
    }
    EXIT_FAILURE
}
