use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::DispatchArgs,
    prelude::*,
    server::payload::Payload,
    tables::{build_merit_order_table, build_plan_table},
};

#[derive(Parser)]
pub struct PlanArgs {
    /// JSON document in the same format `POST /productionplan` accepts.
    pub payload: PathBuf,
}

#[instrument(skip_all)]
pub fn plan(args: &PlanArgs, dispatch: DispatchArgs) -> Result {
    let body = std::fs::read(&args.payload)
        .with_context(|| format!("failed to read `{}`", args.payload.display()))?;
    let payload = Payload::from_slice(&body)?;

    let dispatcher = payload.dispatcher(dispatch.emission_factor);
    let merit_order = dispatcher.merit_order()?;
    let plan = dispatcher.dispatch()?;
    eprintln!("{}", build_merit_order_table(&merit_order));
    eprintln!("{}", build_plan_table(&merit_order, &plan));
    info!(
        load = %payload.load,
        total = %plan.total(),
        cost = %plan.hourly_cost(&merit_order),
        "planned",
    );

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
