//! Local development server.
//!
//! Seeds one match between `alice` and `bob` in the in-memory stores,
//! logs the tokens each side should CONNECT with, and serves until
//! killed. Set `ROOKERY_BIND` to change the listen address and
//! `RUST_LOG` to change verbosity.

use std::sync::Arc;

use rookery::prelude::*;

const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// What a client needs to join the seeded match.
struct Seed {
    game_id: GameId,
    white_token: String,
    black_token: String,
}

async fn seed(identities: &MemoryIdentities, matches: &MemoryMatches) -> Seed {
    let game_id = matches.create(None, None).await;
    for name in ["alice", "bob"] {
        if !matches.seat(game_id, name.into()).await {
            tracing::warn!(%game_id, name, "no free seat in demo match");
        }
    }
    Seed {
        game_id,
        white_token: identities.issue("alice").await,
        black_token: identities.issue("bob").await,
    }
}

#[tokio::main]
async fn main() -> Result<(), RookeryError> {
    init_tracing();

    let bind = std::env::var("ROOKERY_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let identities = Arc::new(MemoryIdentities::new());
    let matches = Arc::new(MemoryMatches::new());

    let seed = seed(&identities, &matches).await;
    tracing::info!(
        game_id = seed.game_id.0,
        white = %seed.white_token,
        black = %seed.black_token,
        "seeded demo match"
    );

    let server = RookeryServerBuilder::new()
        .bind(&bind)
        .build(identities, Arc::clone(&matches), matches)
        .await?;
    server.run().await
}
