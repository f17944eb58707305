// Feed-registry adapter.
//
// Prices come from per-(token, denomination) feed contracts registered
// by the admin. `upsert_pair` resolves and caches a pricing path per
// pair; quotes walk the cached path, composing one hop per feed with
// decimal rescaling at each step. Paths with fewer hops and a USD basis
// are preferred.

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

use strikepool_math::{from_token_amount, wad_div, wad_mul, MAX_DELAY, STALE_PRICE_THRESHOLD};

use crate::error::ErrorMsg;
use crate::interfaces::{PriceFeedClient, RoundData};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Denomination {
    Usd = 0,
    Eth = 1,
    Btc = 2,
}

/// Route from one token into USD terms.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UsdRoute {
    /// The token has a USD feed
    Direct = 0,
    /// ETH feed composed with the ETH/USD cross feed
    ViaEth = 1,
    /// BTC feed composed with the BTC/USD cross feed
    ViaBtc = 2,
}

/// Cached resolution for one (base, quote) pair.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PricingPath {
    /// The quote token proxies a denomination the base has a feed for
    Direct(Denomination),
    /// Both sides priced into USD independently, then divided
    Composed(UsdRoute, UsdRoute),
}

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Admin,
    /// Feed contract for (token, denomination)
    Feed(Address, Denomination),
    /// Cross feed pricing a denomination itself in USD
    CrossFeed(Denomination),
    /// Token standing in for a denomination (e.g. a USD stablecoin)
    Proxy(Address),
    /// Cached path per ordered pair
    Path(Address, Address),
}

#[contract]
pub struct FeedAdapter;

#[contractimpl]
impl FeedAdapter {
    pub fn initialize(env: Env, admin: Address) {
        if env.storage().instance().has(&DataKey::Admin) {
            panic!("{}", ErrorMsg::ALREADY_INITIALIZED);
        }
        env.storage().instance().set(&DataKey::Admin, &admin);
    }

    /// Register or replace the feed pricing `token` in `denomination`.
    pub fn set_feed(env: Env, token: Address, denomination: Denomination, feed: Address) {
        require_admin(&env);
        env.storage()
            .persistent()
            .set(&DataKey::Feed(token, denomination), &feed);
    }

    /// Register the feed pricing a denomination itself in USD, used for
    /// multi-hop routes.
    pub fn set_cross_feed(env: Env, denomination: Denomination, feed: Address) {
        require_admin(&env);
        env.storage()
            .persistent()
            .set(&DataKey::CrossFeed(denomination), &feed);
    }

    /// Mark `token` as a stand-in for `denomination`, enabling direct
    /// single-hop paths against it.
    pub fn set_denomination_proxy(env: Env, token: Address, denomination: Denomination) {
        require_admin(&env);
        env.storage()
            .persistent()
            .set(&DataKey::Proxy(token), &denomination);
    }

    /// Resolve and cache the pricing path for a pair. Re-running picks
    /// up newly registered feeds.
    pub fn upsert_pair(env: Env, base: Address, quote: Address) -> PricingPath {
        require_admin(&env);
        let path = resolve_path(&env, &base, &quote);
        env.storage()
            .persistent()
            .set(&DataKey::Path(base, quote), &path);
        path
    }

    pub fn get_path(env: Env, base: Address, quote: Address) -> PricingPath {
        read_path(&env, &base, &quote)
    }

    /// Spot price of `base` in `quote` (wad). The latest round of every
    /// feed on the path must be within the staleness threshold.
    pub fn quote(env: Env, base: Address, quote: Address) -> u128 {
        let path = read_path(&env, &base, &quote);
        let now = env.ledger().timestamp();
        walk_path(&env, &path, &base, &quote, |env, feed| {
            let round = PriceFeedClient::new(env, feed).latest_round();
            if now.saturating_sub(round.timestamp) > STALE_PRICE_THRESHOLD {
                panic!("{}", ErrorMsg::STALE_PRICE);
            }
            round
        })
    }

    /// Price of `base` in `quote` as of `target`. Each feed contributes
    /// its last round at or before the target; a round staler than the
    /// threshold is accepted only once `MAX_DELAY` has passed beyond
    /// the target.
    pub fn quote_from(env: Env, base: Address, quote: Address, target: u64) -> u128 {
        let path = read_path(&env, &base, &quote);
        let now = env.ledger().timestamp();
        walk_path(&env, &path, &base, &quote, |env, feed| {
            let round = round_at_or_before(env, feed, target);
            if target.saturating_sub(round.timestamp) > STALE_PRICE_THRESHOLD
                && now < target.saturating_add(MAX_DELAY)
            {
                panic!("{}", ErrorMsg::STALE_PRICE);
            }
            round
        })
    }
}

// ============================================================
// PATH RESOLUTION
// ============================================================

fn require_admin(env: &Env) {
    let admin: Address = match env.storage().instance().get(&DataKey::Admin) {
        Some(admin) => admin,
        None => panic!("{}", ErrorMsg::NOT_INITIALIZED),
    };
    admin.require_auth();
}

fn feed_for(env: &Env, token: &Address, denomination: Denomination) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Feed(token.clone(), denomination))
}

fn cross_feed(env: &Env, denomination: Denomination) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::CrossFeed(denomination))
}

fn usd_route(env: &Env, token: &Address) -> Option<UsdRoute> {
    if feed_for(env, token, Denomination::Usd).is_some() {
        return Some(UsdRoute::Direct);
    }
    if feed_for(env, token, Denomination::Eth).is_some()
        && cross_feed(env, Denomination::Eth).is_some()
    {
        return Some(UsdRoute::ViaEth);
    }
    if feed_for(env, token, Denomination::Btc).is_some()
        && cross_feed(env, Denomination::Btc).is_some()
    {
        return Some(UsdRoute::ViaBtc);
    }
    None
}

fn resolve_path(env: &Env, base: &Address, quote: &Address) -> PricingPath {
    // Single hop when the quote token proxies a denomination
    if let Some(denom) = env
        .storage()
        .persistent()
        .get::<_, Denomination>(&DataKey::Proxy(quote.clone()))
    {
        if feed_for(env, base, denom).is_some() {
            return PricingPath::Direct(denom);
        }
    }

    match (usd_route(env, base), usd_route(env, quote)) {
        (Some(b), Some(q)) => PricingPath::Composed(b, q),
        _ => panic!("{}", ErrorMsg::PAIR_UNSUPPORTED),
    }
}

fn read_path(env: &Env, base: &Address, quote: &Address) -> PricingPath {
    match env
        .storage()
        .persistent()
        .get(&DataKey::Path(base.clone(), quote.clone()))
    {
        Some(path) => path,
        None => panic!("{}", ErrorMsg::PAIR_UNSUPPORTED),
    }
}

// ============================================================
// QUOTE COMPOSITION
// ============================================================

/// Wad price from one round of `feed`, via the supplied round selector.
fn feed_price<F>(env: &Env, feed: &Address, select: &F) -> u128
where
    F: Fn(&Env, &Address) -> RoundData,
{
    let round = select(env, feed);
    if round.answer <= 0 {
        panic!("{}", ErrorMsg::INVALID_PRICE);
    }
    let decimals = PriceFeedClient::new(env, feed).decimals();
    from_token_amount(round.answer, decimals)
}

fn usd_price<F>(env: &Env, token: &Address, route: UsdRoute, select: &F) -> u128
where
    F: Fn(&Env, &Address) -> RoundData,
{
    match route {
        UsdRoute::Direct => {
            let feed = require_feed(env, token, Denomination::Usd);
            feed_price(env, &feed, select)
        }
        UsdRoute::ViaEth => {
            let feed = require_feed(env, token, Denomination::Eth);
            let cross = require_cross(env, Denomination::Eth);
            wad_mul(
                env,
                feed_price(env, &feed, select),
                feed_price(env, &cross, select),
            )
        }
        UsdRoute::ViaBtc => {
            let feed = require_feed(env, token, Denomination::Btc);
            let cross = require_cross(env, Denomination::Btc);
            wad_mul(
                env,
                feed_price(env, &feed, select),
                feed_price(env, &cross, select),
            )
        }
    }
}

fn walk_path<F>(env: &Env, path: &PricingPath, base: &Address, quote: &Address, select: F) -> u128
where
    F: Fn(&Env, &Address) -> RoundData,
{
    match path {
        PricingPath::Direct(denom) => {
            let feed = require_feed(env, base, *denom);
            feed_price(env, &feed, &select)
        }
        PricingPath::Composed(base_route, quote_route) => {
            let base_usd = usd_price(env, base, *base_route, &select);
            let quote_usd = usd_price(env, quote, *quote_route, &select);
            if quote_usd == 0 {
                panic!("{}", ErrorMsg::INVALID_PRICE);
            }
            wad_div(env, base_usd, quote_usd)
        }
    }
}

fn require_feed(env: &Env, token: &Address, denomination: Denomination) -> Address {
    match feed_for(env, token, denomination) {
        Some(feed) => feed,
        None => panic!("{}", ErrorMsg::PAIR_UNSUPPORTED),
    }
}

fn require_cross(env: &Env, denomination: Denomination) -> Address {
    match cross_feed(env, denomination) {
        Some(feed) => feed,
        None => panic!("{}", ErrorMsg::PAIR_UNSUPPORTED),
    }
}

/// Last round published at or before `target`, scanning backward from
/// the newest round.
fn round_at_or_before(env: &Env, feed: &Address, target: u64) -> RoundData {
    let client = PriceFeedClient::new(env, feed);
    let count = client.round_count();
    let mut id = count;
    while id > 0 {
        id -= 1;
        let round = client.round(&id);
        if round.timestamp <= target {
            return round;
        }
    }
    panic!("{}", ErrorMsg::NO_HISTORY);
}
