use std::sync::Arc;

use payment_router::infrastructure::config::settings::Config;
use payment_router::run;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
		.init();

	let config = Arc::new(Config::load().expect("Failed to load configuration"));

	#[cfg(feature = "perf")]
	let profiler = pprof::ProfilerGuardBuilder::default()
		.frequency(1000)
		.blocklist(&["libc", "libgcc", "pthread", "vdso"])
		.build()
		.map_err(std::io::Error::other)?;

	let result = run(config).await;

	#[cfg(feature = "perf")]
	if let Ok(report) = profiler.report().build() {
		let file = std::fs::File::create("flamegraph.svg")?;
		report.flamegraph(file).map_err(std::io::Error::other)?;
	}

	result
}
