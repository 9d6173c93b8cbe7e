//! Environment source: `TIDBIT_<SECTION>__<KEY>`, e.g.
//! `TIDBIT_GENERATION__INTERVAL_HOURS=12` or `TIDBIT_PROVIDER__MODEL=...`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "TIDBIT";

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    )
}
