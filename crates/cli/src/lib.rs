// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Command-line interface for the barrage benchmark harness.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]

pub mod opt;

use std::sync::Arc;

use barrage_harness::{config::BenchConfig, runner::BatchRunner};
use barrage_infrastructure::cache::TokenCache;

use crate::opt::BarrageCli;

/// Executes one benchmark run from the parsed CLI options.
///
/// # Errors
///
/// Returns an error if configuration is invalid, a backing service cannot be
/// reached at startup, or the run aborts on a fatal authentication failure.
pub async fn run(cli: BarrageCli) -> anyhow::Result<()> {
    let mut config = BenchConfig::from_env()?;

    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(iterations) = cli.iterations {
        config.iterations = iterations;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    if cli.skip_upload {
        config.upload_url = None;
    }
    config.validate()?;

    let cache = build_cache().await?;

    // The pool handle stays open for the run's lifetime; call logic never
    // touches it (reserved for future persistence of run results)
    #[cfg(feature = "postgres")]
    let _pool = {
        let options = barrage_infrastructure::sql::pg::get_postgres_connect_options(
            None, None, None, None, None,
        );
        let pool = barrage_infrastructure::sql::pg::connect_pg(options.into()).await?;
        log::info!("Opened postgres pool");
        pool
    };

    let mut runner = BatchRunner::new(config, cache);
    let stats = runner.run().await?;

    println!("{stats}");
    Ok(())
}

#[cfg(feature = "redis")]
async fn build_cache() -> anyhow::Result<Arc<dyn TokenCache>> {
    use barrage_harness::env::get_env_var_parsed;
    use barrage_infrastructure::redis::{RedisCacheConfig, RedisTokenCache};

    let config = RedisCacheConfig {
        host: std::env::var("BARRAGE_CACHE_HOST").ok(),
        port: get_env_var_parsed("BARRAGE_CACHE_PORT")?,
        username: std::env::var("BARRAGE_CACHE_USERNAME").ok(),
        password: std::env::var("BARRAGE_CACHE_PASSWORD").ok(),
        ..Default::default()
    };
    let cache = RedisTokenCache::connect(&config).await?;
    Ok(Arc::new(cache))
}

#[cfg(not(feature = "redis"))]
async fn build_cache() -> anyhow::Result<Arc<dyn TokenCache>> {
    use barrage_infrastructure::cache::InMemoryTokenCache;

    Ok(Arc::new(InMemoryTokenCache::new()))
}
