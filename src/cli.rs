use crate::adapter::InferenceAdapter;
use crate::config::{load_config, HydraConfig};
use crate::errors::{HydraError, HydraResult};
use crate::features::FeatureVector;
use crate::radar::RadarProfile;
use crate::reading::RawReading;
use crate::web::{self, PredictResponse};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI interface for HydraAI
#[derive(Parser, Debug)]
#[command(
    name = "hydra",
    version,
    about = "HydraAI irrigation water requirement predictor"
)]
pub struct Cli {
    /// Config file (defaults to $HYDRA_CONFIG_PATH or ./hydra.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured model artifact
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Override the configured scaler artifact
    #[arg(long, global = true)]
    pub scaler: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the water requirement for a reading
    Predict(ReadingArgs),

    /// Print the derived feature vector
    Features(ReadingArgs),

    /// Print the normalized radar-chart profile
    Radar(ReadingArgs),

    /// Report whether the model and scaler are loaded
    Status,

    /// Serve the JSON prediction API
    Serve {
        /// Host/IP to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Sensor reading flags; defaults match a mild, neutral-soil day.
#[derive(Args, Debug, Clone)]
pub struct ReadingArgs {
    /// Temperature (°C)
    #[arg(long, default_value_t = 25.0)]
    pub temperature: f64,
    /// Relative humidity (%)
    #[arg(long, default_value_t = 60.0)]
    pub humidity: f64,
    /// Wind speed (km/h)
    #[arg(long, default_value_t = 5.0)]
    pub wind_speed: f64,
    /// Wind gust (km/h)
    #[arg(long, default_value_t = 10.0)]
    pub wind_gust: f64,
    /// Pressure (kPa)
    #[arg(long, default_value_t = 101.3)]
    pub pressure: f64,
    /// Soil pH, in steps of 0.5
    #[arg(long, default_value_t = 7.0)]
    pub soil_ph: f64,
}

impl ReadingArgs {
    pub fn to_reading(&self) -> RawReading {
        RawReading::new(
            self.temperature,
            self.humidity,
            self.wind_speed,
            self.wind_gust,
            self.pressure,
            self.soil_ph,
        )
    }
}

impl Cli {
    /// Configuration with command-line overrides applied
    pub fn resolve_config(&self) -> HydraResult<HydraConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(model) = &self.model {
            config.artifacts.model_path = model.clone();
        }
        if let Some(scaler) = &self.scaler {
            config.artifacts.scaler_path = scaler.clone();
        }
        if let Some(level) = &self.log_level {
            crate::telemetry::parse_level(level)?;
            config.log_level = level.clone();
        }
        Ok(config)
    }

    fn uses_default_artifacts(&self) -> bool {
        self.config.is_none() && self.model.is_none() && self.scaler.is_none()
    }

    /// The shared process-wide adapter unless artifacts were overridden.
    pub fn adapter(&self, config: &HydraConfig) -> InferenceAdapter {
        if self.uses_default_artifacts() {
            InferenceAdapter::global().clone()
        } else {
            InferenceAdapter::from_config(config)
        }
    }
}

/// User-facing warning for a prediction refused for lack of artifacts,
/// naming the artifact and the underlying reason.
fn unavailable_warning(err: &HydraError) -> Option<String> {
    err.is_artifacts_missing()
        .then(|| format!("{err}. Provide a loadable model and scaler."))
}

pub async fn dispatch(cli: Cli, config: HydraConfig) -> HydraResult<()> {
    match &cli.command {
        Commands::Predict(args) => {
            let reading = args.to_reading().validated()?;
            let adapter = cli.adapter(&config);
            let result = match adapter.predict(&reading) {
                Ok(result) => result,
                Err(e) => {
                    if let Some(warning) = unavailable_warning(&e) {
                        eprintln!("{warning}");
                    }
                    return Err(e);
                }
            };

            if cli.json {
                let body = PredictResponse::new(&reading, result);
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("Water Needed: {result}");
                println!("Model: {}", result.model_id);
            }
        }

        Commands::Features(args) => {
            let reading = args.to_reading().validated()?;
            let features = FeatureVector::from_reading(&reading);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&features)?);
            } else {
                for (name, value) in features.named() {
                    println!("{name:<16} {value}");
                }
            }
        }

        Commands::Radar(args) => {
            let reading = args.to_reading().validated()?;
            let profile = RadarProfile::from_reading(&reading);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                for axis in &profile.axes {
                    println!("{:<9} {:.3}", axis.label, axis.value);
                }
            }
        }

        Commands::Status => {
            let status = cli.adapter(&config).status();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else if let Some(model_id) = &status.model_id {
                println!("Artifacts loaded (model: {model_id})");
            } else if let Some(why) = &status.unavailable {
                println!("Artifacts unavailable: {} at {} ({})", why.artifact, why.path, why.reason);
            }
        }

        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let adapter = cli.adapter(&config);
            if !adapter.is_ready() {
                tracing::warn!("Starting without artifacts; /api/predict will answer 503");
            }
            web::serve(adapter, &host, port).await?;
        }
    }
    Ok(())
}
