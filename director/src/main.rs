//! Director: configures both builders, runs the task once, prints the result.
//!
//! Configuration errors exit non-zero. Network and response failures are
//! silent by design of the task and exit zero with no output.

mod cli;

use builder_core::{RequestDescriptor, RequestSpecBuilder, TaskBuilder};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, info};

use cli::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    cli::init_tracing(&cli);
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let descriptor = build_request(&cli)?;

    if cli.dry_run {
        print_request(&descriptor);
        return Ok(());
    }

    let task = TaskBuilder::new()
        .set_request(descriptor)
        .build()
        .wrap_err("failed to build task")?;

    info!(url = %task.descriptor().url(), "running task");
    match task.run().wait() {
        Some(object) => debug!(keys = object.len(), "task printed a response object"),
        None => debug!("task finished without output"),
    }
    Ok(())
}

fn build_request(cli: &Cli) -> Result<RequestDescriptor> {
    let mut builder = RequestSpecBuilder::new();
    builder
        .set_base_address(&cli.base_address)
        .wrap_err("invalid base address")?
        .set_path(&cli.path)
        .set_method(cli.method);
    for (key, value) in &cli.headers {
        builder.add_header(key, value);
    }
    for (key, value) in &cli.params {
        builder.add_parameter(key, value);
    }
    builder.build().wrap_err("failed to build request")
}

fn print_request(descriptor: &RequestDescriptor) {
    let request = descriptor.request();
    println!("{} {}", request.method, request.url);
    for (key, value) in &request.headers {
        println!("{key}: {value}");
    }
}
