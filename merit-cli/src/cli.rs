mod plan;
mod serve;

use clap::{Parser, Subcommand};
use merit_quantities::emission::EmissionIntensity;

pub use self::{
    plan::{PlanArgs, plan},
    serve::{ServeArgs, serve},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub dispatch: DispatchArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve `POST /productionplan`.
    #[clap(name = "serve")]
    Serve(ServeArgs),

    /// Compute the production plan for a payload file and print it.
    #[clap(name = "plan")]
    Plan(PlanArgs),
}

#[derive(Copy, Clone, Parser)]
pub struct DispatchArgs {
    /// Tonnes of CO₂ emitted per megawatt-hour produced by gas-fired plants.
    #[clap(long = "co2-emission-factor", default_value = "0.3", env = "CO2_EMISSION_FACTOR")]
    pub emission_factor: EmissionIntensity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_ok() {
        let args = Args::try_parse_from(["merit", "serve", "--archive-directory", "responses"]);
        let Command::Serve(serve_args) = args.unwrap().command else {
            panic!("expected `serve`");
        };
        assert_eq!(serve_args.bind_address, "0.0.0.0:8888");
        assert_eq!(serve_args.archive_directory.unwrap().to_str(), Some("responses"));
    }

    #[test]
    fn parse_emission_factor_ok() {
        let args =
            Args::try_parse_from(["merit", "--co2-emission-factor", "0.5", "plan", "payload.json"])
                .unwrap();
        assert_eq!(args.dispatch.emission_factor, EmissionIntensity::new(0.5));
    }
}
