#![no_std]

use soroban_sdk::{contract, contractimpl, token, Address, Env, Symbol, Vec};

// External packages
use strikepool_math::{
    is_on_lattice, mul_div, to_signed, to_token_amount, wad_add, wad_div, wad_min, wad_mul,
    wad_sub, MAX_RECONCILE_CROSSINGS, MAX_TICK_PRICE, MIN_TICK_PRICE, WAD, WITHDRAWAL_DELAY,
};
use strikepool_position::{
    asset_delta, collateral as position_collateral, format_token_id, liquidity_per_tick,
    longs as position_longs, position_delta, shorts as position_shorts, update_claimable_fees,
    Delta, OrderSpec, OrderType, PositionData, PositionKey, LONG_TOKEN_ID, SHORT_TOKEN_ID,
};
use strikepool_pricing::{quote_amm, taker_fee, trade_amm, TradeState};
use strikepool_tick::index as tick_index;
use strikepool_tick::{add_delta, apply_endpoint_delta, cross_tick, new_tick, range_fee_rate};

// Local modules
mod error;
mod events;
mod interfaces;
mod storage;
pub mod types;

pub use error::PoolError;

use error::ErrorMsg;
use events::*;
use interfaces::{OracleAdapterClient, UserSettingsClient};
use storage::*;
use types::{DepositOptions, PoolConfig, PoolState, PositionInfo, QuoteResult};

#[contract]
pub struct StrikePool;

#[contractimpl]
impl StrikePool {
    // ========================================================
    // INITIALIZATION
    // ========================================================

    /// Initialize the pool for one (pair, strike, maturity, side).
    ///
    /// The market price starts unset: the first deposit resolves it to
    /// that order's own boundary.
    pub fn initialize(
        env: Env,
        base: Address,
        quote: Address,
        base_decimals: u32,
        quote_decimals: u32,
        oracle_adapter: Address,
        user_settings: Address,
        fee_receiver: Address,
        strike: u128,
        maturity: u64,
        is_call: bool,
    ) {
        if is_initialized(&env) {
            panic!("{}", ErrorMsg::ALREADY_INITIALIZED);
        }
        if strike == 0 {
            panic!("{}", ErrorMsg::INVALID_STRIKE);
        }
        if maturity <= env.ledger().timestamp() {
            panic!("{}", ErrorMsg::INVALID_MATURITY);
        }

        let config = PoolConfig {
            base: base.clone(),
            quote: quote.clone(),
            base_decimals,
            quote_decimals,
            oracle_adapter,
            user_settings,
            fee_receiver,
            strike,
            maturity,
            is_call,
        };
        write_pool_config(&env, &config);

        let state = PoolState {
            current_tick: MIN_TICK_PRICE,
            market_price: 0,
            liquidity_rate: 0,
            long_rate: 0,
            short_rate: 0,
            global_fee_rate: 0,
            protocol_fees: 0,
            settlement_price: 0,
        };
        write_pool_state(&env, &state);
        write_tick_index(&env, &tick_index::new_index(&env));
        set_initialized(&env);

        emit_initialized(&env, &base, &quote, strike, maturity, is_call);
    }

    // ========================================================
    // VIEW FUNCTIONS
    // ========================================================

    pub fn is_initialized(env: Env) -> bool {
        is_initialized(&env)
    }

    pub fn get_pool_state(env: Env) -> PoolState {
        read_pool_state(&env)
    }

    pub fn get_pool_config(env: Env) -> PoolConfig {
        read_pool_config(&env)
    }

    /// Internal-ledger balance of `owner` for one token id.
    pub fn balance_of(env: Env, owner: Address, token_id: u128) -> u128 {
        read_balance(&env, &owner, token_id)
    }

    pub fn get_tick(env: Env, price: u128) -> types::Tick {
        read_tick(&env, price)
    }

    pub fn get_tick_prices(env: Env) -> Vec<u128> {
        read_tick_index(&env)
    }

    /// Size plus composition of a range order at the current market
    /// price, and the fees it could claim right now.
    pub fn get_position_info(env: Env, key: PositionKey) -> PositionInfo {
        let config = read_pool_config(&env);
        let state = read_pool_state(&env);
        let spec = order_spec(&config, &key);
        let size = read_balance(&env, &key.owner, position_token_id(&env, &key));

        let claimable = match read_position(&env, &key) {
            Some(mut data) => {
                let rate = range_rate(&env, &state, key.lower, key.upper);
                update_claimable_fees(&env, &mut data, rate, per_tick(size, key.lower, key.upper));
                data.claimable_fees
            }
            None => 0,
        };

        PositionInfo {
            size,
            collateral: position_collateral(&env, &spec, size, state.market_price),
            longs: position_longs(&env, &spec, size, state.market_price),
            shorts: position_shorts(&env, &spec, size, state.market_price),
            claimable_fees: claimable,
        }
    }

    /// Quote a trade against the curve. Byte-identical numbers to
    /// `trade` at the same state; failures come back structured instead
    /// of trapping.
    pub fn get_quote_amm(env: Env, size: u128, is_buy: bool) -> QuoteResult {
        let config = read_pool_config(&env);
        let state = read_pool_state(&env);

        if size == 0 {
            return QuoteResult::invalid(Symbol::new(&env, "AMT_ZERO"));
        }
        if env.ledger().timestamp() >= config.maturity {
            return QuoteResult::invalid(Symbol::new(&env, "EXPIRED"));
        }
        if state.market_price == 0 {
            return QuoteResult::invalid(Symbol::new(&env, "NO_LIQ"));
        }

        let index = read_tick_index(&env);
        let trade_state = TradeState {
            current_tick: state.current_tick,
            market_price: state.market_price,
            liquidity_rate: state.liquidity_rate,
            long_rate: state.long_rate,
            short_rate: state.short_rate,
            global_fee_rate: state.global_fee_rate,
            protocol_fees: state.protocol_fees,
        };

        let result = quote_amm(
            &env,
            &trade_state,
            &index,
            |e, t| read_tick(e, t),
            size,
            is_buy,
            config.strike,
            config.is_call,
        );

        if result.size_filled < size {
            return QuoteResult::invalid(Symbol::new(&env, "NO_LIQ"));
        }
        QuoteResult::valid(&env, result.total_premium, result.total_taker_fee)
    }

    // ========================================================
    // RANGE ORDERS
    // ========================================================

    /// Deposit `size` contracts into the range order identified by
    /// (owner, operator, lower, upper, order_type).
    ///
    /// The hints in `options` are advisory index shortcuts; a zero or
    /// misplaced hint falls back to a full search. `min/max
    /// market_price` bound the (possibly stranded-resolved) market price
    /// the deposit executes at, and `is_bid_if_stranded` picks which
    /// boundary the market price moves to when the book is stranded.
    pub fn deposit(
        env: Env,
        owner: Address,
        operator: Address,
        lower: u128,
        upper: u128,
        order_type: OrderType,
        size: u128,
        options: DepositOptions,
    ) {
        guard_enter(&env);
        operator.require_auth();

        let config = read_pool_config(&env);
        require_not_expired(&env, &config);
        validate_range(lower, upper);
        if size == 0 {
            panic!("{}", ErrorMsg::INVALID_SIZE);
        }
        let rate = match liquidity_per_tick(size, lower, upper) {
            Ok(rate) => rate,
            Err(msg) => panic!("{}", msg),
        };

        let mut state = read_pool_state(&env);
        let mut index = read_tick_index(&env);

        if is_stranded(&state, &index, lower, upper) {
            state.market_price = if options.is_bid_if_stranded { upper } else { lower };
        }
        if state.market_price < options.min_market_price
            || state.market_price > options.max_market_price
        {
            panic!("{}", ErrorMsg::PRICE_OUT_OF_BOUNDS);
        }

        let key = PositionKey {
            owner: owner.clone(),
            operator: operator.clone(),
            lower,
            upper,
            order_type,
        };
        let existing = read_position(&env, &key);

        // Endpoint ticks count live positions, not deposits: only the
        // position's first deposit adds a reference.
        let is_new = existing.is_none();
        ensure_tick(&env, &mut index, &state, lower, options.below_lower_hint, is_new);
        ensure_tick(&env, &mut index, &state, upper, options.below_upper_hint, is_new);

        // Settle accrued fees against the pre-deposit balance
        let token_id = position_token_id(&env, &key);
        let balance = read_balance(&env, &owner, token_id);
        let fee_rate = range_rate(&env, &state, lower, upper);
        let mut data = match existing {
            Some(mut data) => {
                update_claimable_fees(&env, &mut data, fee_rate, per_tick(balance, lower, upper));
                data
            }
            None => PositionData {
                last_fee_rate: fee_rate,
                claimable_fees: 0,
                last_deposit: 0,
            },
        };

        apply_range_liquidity(&env, &mut state, lower, upper, to_signed(rate), order_type);
        reconcile(&env, &mut state, &index);

        // Pull the assets the enlarged position represents
        let spec = order_spec(&config, &key);
        let delta = position_delta(&env, &spec, balance, to_signed(size), state.market_price);
        pull_assets(&env, &config, &operator, &delta);

        add_balance(&env, &owner, token_id, size);
        data.last_deposit = env.ledger().timestamp();
        write_position(&env, &key, &data);
        write_tick_index(&env, &index);
        write_pool_state(&env, &state);

        emit_deposit(&env, &key, size, state.market_price);
        guard_exit(&env);
    }

    /// Withdraw `size` contracts from a range order. A full withdrawal
    /// also pays out accrued fees and deletes the position.
    pub fn withdraw(
        env: Env,
        owner: Address,
        operator: Address,
        lower: u128,
        upper: u128,
        order_type: OrderType,
        size: u128,
        min_market_price: u128,
        max_market_price: u128,
    ) {
        guard_enter(&env);
        operator.require_auth();

        let config = read_pool_config(&env);
        require_not_expired(&env, &config);
        validate_range(lower, upper);
        if size == 0 {
            panic!("{}", ErrorMsg::INVALID_SIZE);
        }
        let rate = match liquidity_per_tick(size, lower, upper) {
            Ok(rate) => rate,
            Err(msg) => panic!("{}", msg),
        };

        let key = PositionKey {
            owner: owner.clone(),
            operator: operator.clone(),
            lower,
            upper,
            order_type,
        };
        let mut data = match read_position(&env, &key) {
            Some(data) => data,
            None => panic!("{}", ErrorMsg::POSITION_NOT_FOUND),
        };
        if env.ledger().timestamp() < data.last_deposit + WITHDRAWAL_DELAY {
            panic!("{}", ErrorMsg::WITHDRAWAL_TOO_EARLY);
        }

        let token_id = position_token_id(&env, &key);
        let balance = read_balance(&env, &owner, token_id);
        if balance < size {
            panic!("{}", ErrorMsg::INSUFFICIENT_BALANCE);
        }

        let mut state = read_pool_state(&env);
        let mut index = read_tick_index(&env);
        if state.market_price < min_market_price || state.market_price > max_market_price {
            panic!("{}", ErrorMsg::PRICE_OUT_OF_BOUNDS);
        }

        let fee_rate = range_rate(&env, &state, lower, upper);
        update_claimable_fees(&env, &mut data, fee_rate, per_tick(balance, lower, upper));

        apply_range_liquidity(&env, &mut state, lower, upper, -to_signed(rate), order_type);

        // Push the assets the shrunk position no longer represents
        let spec = order_spec(&config, &key);
        let delta = position_delta(&env, &spec, balance, -to_signed(size), state.market_price);
        push_assets(&env, &config, &operator, &delta);

        sub_balance(&env, &owner, token_id, size, ErrorMsg::INSUFFICIENT_BALANCE);

        // The position's tick references drop only when it is deleted;
        // a partial withdrawal keeps both endpoints pinned.
        let mut fees_paid = 0;
        if balance == size {
            fees_paid = data.claimable_fees;
            transfer_collateral_out(&env, &config, &operator, fees_paid);
            remove_position(&env, &key);
            release_tick(&env, &mut index, &mut state, lower);
            release_tick(&env, &mut index, &mut state, upper);
        } else {
            write_position(&env, &key, &data);
        }

        write_tick_index(&env, &index);
        write_pool_state(&env, &state);

        emit_withdraw(&env, &key, size, fees_paid);
        guard_exit(&env);
    }

    /// Pay out a range order's accrued fees without touching its size.
    pub fn claim(env: Env, key: PositionKey) -> u128 {
        guard_enter(&env);
        key.operator.require_auth();

        let config = read_pool_config(&env);
        let mut data = match read_position(&env, &key) {
            Some(data) => data,
            None => panic!("{}", ErrorMsg::POSITION_NOT_FOUND),
        };
        let state = read_pool_state(&env);
        let balance = read_balance(&env, &key.owner, position_token_id(&env, &key));

        let fee_rate = range_rate(&env, &state, key.lower, key.upper);
        update_claimable_fees(&env, &mut data, fee_rate, per_tick(balance, key.lower, key.upper));

        let amount = data.claimable_fees;
        data.claimable_fees = 0;
        write_position(&env, &key, &data);
        transfer_collateral_out(&env, &config, &key.operator, amount);

        emit_claim(&env, &key, amount);
        guard_exit(&env);
        amount
    }

    /// Move `size` contracts (and a proportional share of accrued fees)
    /// to another owner/operator over the same range.
    pub fn transfer_position(
        env: Env,
        key: PositionKey,
        new_owner: Address,
        new_operator: Address,
        size: u128,
    ) {
        guard_enter(&env);
        key.operator.require_auth();

        if size == 0 {
            panic!("{}", ErrorMsg::INVALID_SIZE);
        }
        let mut data = match read_position(&env, &key) {
            Some(data) => data,
            None => panic!("{}", ErrorMsg::POSITION_NOT_FOUND),
        };
        let token_id = position_token_id(&env, &key);
        let balance = read_balance(&env, &key.owner, token_id);
        if balance < size {
            panic!("{}", ErrorMsg::INSUFFICIENT_BALANCE);
        }

        let mut state = read_pool_state(&env);
        let mut index = read_tick_index(&env);
        let fee_rate = range_rate(&env, &state, key.lower, key.upper);

        // Both checkpoints must sit at the current rate before fees move
        update_claimable_fees(&env, &mut data, fee_rate, per_tick(balance, key.lower, key.upper));
        let moved_fees = mul_div(&env, data.claimable_fees, size, balance);
        data.claimable_fees -= moved_fees;

        let dest_key = PositionKey {
            owner: new_owner.clone(),
            operator: new_operator.clone(),
            lower: key.lower,
            upper: key.upper,
            order_type: key.order_type,
        };
        let dest_token_id = position_token_id(&env, &dest_key);
        let dest_balance = read_balance(&env, &new_owner, dest_token_id);
        let mut dest_data = match read_position(&env, &dest_key) {
            Some(mut dest) => {
                update_claimable_fees(
                    &env,
                    &mut dest,
                    fee_rate,
                    per_tick(dest_balance, key.lower, key.upper),
                );
                // Merging must not shorten the destination's withdrawal
                // delay: keep the younger of the two deposit clocks.
                if data.last_deposit > dest.last_deposit {
                    dest.last_deposit = data.last_deposit;
                }
                dest
            }
            None => {
                // a fresh destination references the endpoint ticks too
                for price in [key.lower, key.upper] {
                    let mut tick = read_tick(&env, price);
                    tick.counter += 1;
                    write_tick(&env, price, &tick);
                }
                PositionData {
                    last_fee_rate: fee_rate,
                    claimable_fees: 0,
                    last_deposit: data.last_deposit,
                }
            }
        };
        dest_data.claimable_fees = wad_add(dest_data.claimable_fees, moved_fees);

        sub_balance(&env, &key.owner, token_id, size, ErrorMsg::INSUFFICIENT_BALANCE);
        add_balance(&env, &new_owner, dest_token_id, size);
        write_position(&env, &dest_key, &dest_data);

        if balance == size && data.claimable_fees == 0 {
            remove_position(&env, &key);
            release_tick(&env, &mut index, &mut state, key.lower);
            release_tick(&env, &mut index, &mut state, key.upper);
            write_tick_index(&env, &index);
            write_pool_state(&env, &state);
        } else {
            write_position(&env, &key, &data);
        }

        emit_transfer_position(&env, &key, &new_owner, size);
        guard_exit(&env);
    }

    // ========================================================
    // TRADING
    // ========================================================

    /// Trade `size` contracts against the range liquidity.
    ///
    /// Buys pay `premium + fee` and must stay at or under
    /// `premium_limit`; sells receive `premium - fee` and must stay at
    /// or over it. Returns `(premium, taker_fee)`.
    pub fn trade(
        env: Env,
        taker: Address,
        size: u128,
        is_buy: bool,
        premium_limit: u128,
    ) -> (u128, u128) {
        guard_enter(&env);
        taker.require_auth();

        let config = read_pool_config(&env);
        require_not_expired(&env, &config);
        if size == 0 {
            panic!("{}", ErrorMsg::INVALID_SIZE);
        }

        let mut state = read_pool_state(&env);
        let index = read_tick_index(&env);
        let mut trade_state = TradeState {
            current_tick: state.current_tick,
            market_price: state.market_price,
            liquidity_rate: state.liquidity_rate,
            long_rate: state.long_rate,
            short_rate: state.short_rate,
            global_fee_rate: state.global_fee_rate,
            protocol_fees: state.protocol_fees,
        };

        let result = trade_amm(
            &env,
            &mut trade_state,
            &index,
            |e, t| read_tick(e, t),
            |e, t, tick| write_tick(e, t, tick),
            size,
            is_buy,
            config.strike,
            config.is_call,
        );

        if is_buy {
            let cost = wad_add(result.total_premium, result.total_taker_fee);
            if cost > premium_limit {
                panic!("{}", ErrorMsg::PREMIUM_LIMIT);
            }
        } else {
            let proceeds = to_signed(result.total_premium) - to_signed(result.total_taker_fee);
            if proceeds < to_signed(premium_limit) {
                panic!("{}", ErrorMsg::PREMIUM_LIMIT);
            }
        }

        state.current_tick = trade_state.current_tick;
        state.market_price = trade_state.market_price;
        state.liquidity_rate = trade_state.liquidity_rate;
        state.long_rate = trade_state.long_rate;
        state.short_rate = trade_state.short_rate;
        state.global_fee_rate = trade_state.global_fee_rate;
        state.protocol_fees = trade_state.protocol_fees;
        write_pool_state(&env, &state);

        // Maker inventory follows the swept liquidity
        let this = env.current_contract_address();
        if is_buy {
            sub_balance(&env, &this, LONG_TOKEN_ID, result.maker_longs, ErrorMsg::INSUFFICIENT_LONGS);
            add_balance(&env, &this, SHORT_TOKEN_ID, result.maker_shorts);
        } else {
            add_balance(&env, &this, LONG_TOKEN_ID, result.maker_longs);
            sub_balance(&env, &this, SHORT_TOKEN_ID, result.maker_shorts, ErrorMsg::INSUFFICIENT_SHORTS);
        }

        let premium_net = if is_buy {
            -to_signed(wad_add(result.total_premium, result.total_taker_fee))
        } else {
            to_signed(result.total_premium) - to_signed(result.total_taker_fee)
        };
        apply_party_fill(&env, &config, &taker, size, is_buy, premium_net);

        emit_trade(
            &env,
            &taker,
            size,
            is_buy,
            result.total_premium,
            result.total_taker_fee,
            state.market_price,
        );
        guard_exit(&env);
        (result.total_premium, result.total_taker_fee)
    }

    /// Fill a peer-to-peer quote at an agreed price off the curve. No
    /// range liquidity is consumed, so the entire taker fee accrues to
    /// the protocol. Provider authorization stands in for signature
    /// verification of the off-chain quote.
    pub fn fill_quote_rfq(
        env: Env,
        provider: Address,
        taker: Address,
        size: u128,
        price: u128,
        is_buy: bool,
    ) -> (u128, u128) {
        guard_enter(&env);
        provider.require_auth();
        taker.require_auth();

        let config = read_pool_config(&env);
        require_not_expired(&env, &config);
        if size == 0 {
            panic!("{}", ErrorMsg::INVALID_SIZE);
        }
        if price == 0 || price > MAX_TICK_PRICE {
            panic!("{}", ErrorMsg::PRICE_OUT_OF_BOUNDS);
        }

        let premium = contracts_to_collateral(&env, &config, wad_mul(&env, price, size));
        let fee = taker_fee(&env, premium, size, config.strike, config.is_call);

        let mut state = read_pool_state(&env);
        state.protocol_fees = wad_add(state.protocol_fees, fee);
        write_pool_state(&env, &state);

        let taker_net = if is_buy {
            -to_signed(wad_add(premium, fee))
        } else {
            to_signed(premium) - to_signed(fee)
        };
        let provider_net = if is_buy {
            to_signed(premium)
        } else {
            -to_signed(premium)
        };
        apply_party_fill(&env, &config, &taker, size, is_buy, taker_net);
        apply_party_fill(&env, &config, &provider, size, !is_buy, provider_net);

        emit_rfq_fill(&env, &provider, &taker, size, price, is_buy, premium, fee);
        guard_exit(&env);
        (premium, fee)
    }

    // ========================================================
    // OPTION LEGS
    // ========================================================

    /// Burn equal long and short legs and release their collateral.
    pub fn annihilate(env: Env, owner: Address, size: u128) {
        owner.require_auth();
        Self::annihilate_inner(&env, &owner, &owner, size);
    }

    /// Operator variant of `annihilate`, gated by the user-settings
    /// contract. Collateral is released to the owner.
    pub fn annihilate_for(env: Env, operator: Address, owner: Address, size: u128) {
        operator.require_auth();
        let config = read_pool_config(&env);
        require_operator_authorized(&env, &config, &owner, &operator);
        Self::annihilate_inner(&env, &owner, &owner, size);
    }

    /// Mint a long/short pair against the underwriter's collateral:
    /// shorts stay with the underwriter, longs go to the receiver.
    pub fn write_from(
        env: Env,
        operator: Address,
        underwriter: Address,
        long_receiver: Address,
        size: u128,
    ) {
        guard_enter(&env);
        operator.require_auth();

        let config = read_pool_config(&env);
        require_not_expired(&env, &config);
        if size == 0 {
            panic!("{}", ErrorMsg::INVALID_SIZE);
        }
        if operator != underwriter {
            require_operator_authorized(&env, &config, &underwriter, &operator);
        }

        let collateral = contracts_to_collateral(&env, &config, size);
        transfer_collateral_in(&env, &config, &underwriter, collateral);
        add_balance(&env, &underwriter, SHORT_TOKEN_ID, size);
        add_balance(&env, &long_receiver, LONG_TOKEN_ID, size);

        emit_write(&env, &underwriter, &long_receiver, size, collateral);
        guard_exit(&env);
    }

    // ========================================================
    // SETTLEMENT
    // ========================================================

    /// Exercise the caller's long contracts at the frozen settlement
    /// price. Returns the payout (collateral wad).
    pub fn exercise(env: Env, holder: Address) -> u128 {
        guard_enter(&env);
        holder.require_auth();
        let payout = Self::exercise_inner(&env, &holder, 0, &holder);
        guard_exit(&env);
        payout
    }

    /// Exercise on behalf of holders, deducting a pre-authorized
    /// automation cost per holder, paid to the operator.
    pub fn exercise_for(env: Env, operator: Address, holders: Vec<Address>, cost: u128) {
        guard_enter(&env);
        operator.require_auth();
        let config = read_pool_config(&env);
        for holder in holders.iter() {
            require_operator_authorized(&env, &config, &holder, &operator);
            require_cost_authorized(&env, &config, &holder, cost);
            Self::exercise_inner(&env, &holder, cost, &operator);
        }
        guard_exit(&env);
    }

    /// Settle the caller's short contracts: burn them and return the
    /// residual collateral not owed to longs.
    pub fn settle(env: Env, holder: Address) -> u128 {
        guard_enter(&env);
        holder.require_auth();
        let residual = Self::settle_inner(&env, &holder, 0, &holder);
        guard_exit(&env);
        residual
    }

    /// Settle shorts on behalf of holders, deducting a pre-authorized
    /// automation cost per holder.
    pub fn settle_for(env: Env, operator: Address, holders: Vec<Address>, cost: u128) {
        guard_enter(&env);
        operator.require_auth();
        let config = read_pool_config(&env);
        for holder in holders.iter() {
            require_operator_authorized(&env, &config, &holder, &operator);
            require_cost_authorized(&env, &config, &holder, cost);
            Self::settle_inner(&env, &holder, cost, &operator);
        }
        guard_exit(&env);
    }

    /// Settle a whole range order after maturity: decompose it at the
    /// frozen market price, settle both option legs, pay principal plus
    /// accrued fees, and delete the position.
    pub fn settle_position(env: Env, key: PositionKey) -> u128 {
        guard_enter(&env);
        key.operator.require_auth();
        let payout = Self::settle_position_inner(&env, &key, 0, &key.operator);
        guard_exit(&env);
        payout
    }

    /// Settle range orders on behalf of their operators, deducting a
    /// pre-authorized automation cost per position.
    pub fn settle_position_for(env: Env, operator: Address, keys: Vec<PositionKey>, cost: u128) {
        guard_enter(&env);
        operator.require_auth();
        let config = read_pool_config(&env);
        for key in keys.iter() {
            require_operator_authorized(&env, &config, &key.owner, &operator);
            require_cost_authorized(&env, &config, &key.owner, cost);
            Self::settle_position_inner(&env, &key, cost, &operator);
        }
        guard_exit(&env);
    }

    /// Sweep accumulated protocol fees to the configured receiver.
    pub fn claim_protocol_fees(env: Env) -> u128 {
        guard_enter(&env);
        let config = read_pool_config(&env);
        let mut state = read_pool_state(&env);
        let amount = state.protocol_fees;
        state.protocol_fees = 0;
        write_pool_state(&env, &state);
        transfer_collateral_out(&env, &config, &config.fee_receiver, amount);
        emit_protocol_fees_claimed(&env, &config.fee_receiver, amount);
        guard_exit(&env);
        amount
    }
}

// ============================================================
// INTERNAL OPERATIONS
// ============================================================

impl StrikePool {
    fn annihilate_inner(env: &Env, long_holder: &Address, short_holder: &Address, size: u128) {
        guard_enter(env);
        let config = read_pool_config(env);
        if size == 0 {
            panic!("{}", ErrorMsg::INVALID_SIZE);
        }
        sub_balance(env, long_holder, LONG_TOKEN_ID, size, ErrorMsg::INSUFFICIENT_LONGS);
        sub_balance(env, short_holder, SHORT_TOKEN_ID, size, ErrorMsg::INSUFFICIENT_SHORTS);
        let collateral = contracts_to_collateral(env, &config, size);
        transfer_collateral_out(env, &config, short_holder, collateral);
        emit_annihilate(env, short_holder, size, collateral);
        guard_exit(env);
    }

    fn exercise_inner(env: &Env, holder: &Address, cost: u128, cost_receiver: &Address) -> u128 {
        let config = read_pool_config(env);
        require_expired(env, &config);
        let mut state = read_pool_state(env);
        let spot = settlement_price(env, &config, &mut state);
        write_pool_state(env, &state);

        let size = read_balance(env, holder, LONG_TOKEN_ID);
        if size == 0 {
            return 0;
        }
        write_balance(env, holder, LONG_TOKEN_ID, 0);

        let value = wad_mul(env, size, long_value(env, &config, spot));
        let payout = wad_sub(value, wad_min(value, cost));
        transfer_collateral_out(env, &config, holder, payout);
        if cost > 0 {
            transfer_collateral_out(env, &config, cost_receiver, wad_min(value, cost));
        }
        emit_exercise(env, holder, size, payout);
        payout
    }

    fn settle_inner(env: &Env, holder: &Address, cost: u128, cost_receiver: &Address) -> u128 {
        let config = read_pool_config(env);
        require_expired(env, &config);
        let mut state = read_pool_state(env);
        let spot = settlement_price(env, &config, &mut state);
        write_pool_state(env, &state);

        let size = read_balance(env, holder, SHORT_TOKEN_ID);
        if size == 0 {
            return 0;
        }
        write_balance(env, holder, SHORT_TOKEN_ID, 0);

        let value = wad_mul(env, size, short_residual(env, &config, spot));
        let residual = wad_sub(value, wad_min(value, cost));
        transfer_collateral_out(env, &config, holder, residual);
        if cost > 0 {
            transfer_collateral_out(env, &config, cost_receiver, wad_min(value, cost));
        }
        emit_settle(env, holder, size, residual);
        residual
    }

    fn settle_position_inner(
        env: &Env,
        key: &PositionKey,
        cost: u128,
        cost_receiver: &Address,
    ) -> u128 {
        let config = read_pool_config(env);
        require_expired(env, &config);
        let mut state = read_pool_state(env);
        let spot = settlement_price(env, &config, &mut state);

        let mut data = match read_position(env, key) {
            Some(data) => data,
            None => panic!("{}", ErrorMsg::POSITION_NOT_FOUND),
        };
        let token_id = position_token_id(env, key);
        let balance = read_balance(env, &key.owner, token_id);

        let fee_rate = range_rate(env, &state, key.lower, key.upper);
        update_claimable_fees(env, &mut data, fee_rate, per_tick(balance, key.lower, key.upper));

        // Decompose the order at the frozen market price
        let spec = order_spec(&config, key);
        let collateral = position_collateral(env, &spec, balance, state.market_price);
        let longs = position_longs(env, &spec, balance, state.market_price);
        let shorts = position_shorts(env, &spec, balance, state.market_price);

        // The maker's legs live in pool inventory; burn them here
        let this = env.current_contract_address();
        sub_balance(env, &this, LONG_TOKEN_ID, longs, ErrorMsg::INSUFFICIENT_LONGS);
        sub_balance(env, &this, SHORT_TOKEN_ID, shorts, ErrorMsg::INSUFFICIENT_SHORTS);

        let value = wad_add(
            wad_add(collateral, data.claimable_fees),
            wad_add(
                wad_mul(env, longs, long_value(env, &config, spot)),
                wad_mul(env, shorts, short_residual(env, &config, spot)),
            ),
        );
        let payout = wad_sub(value, wad_min(value, cost));

        // Unwind the order's tick liquidity
        let rate = per_tick(balance, key.lower, key.upper);
        if rate > 0 {
            apply_range_liquidity(env, &mut state, key.lower, key.upper, -to_signed(rate), key.order_type);
        }
        let mut index = read_tick_index(env);
        release_tick(env, &mut index, &mut state, key.lower);
        release_tick(env, &mut index, &mut state, key.upper);

        write_balance(env, &key.owner, token_id, 0);
        remove_position(env, key);
        write_tick_index(env, &index);
        write_pool_state(env, &state);

        transfer_collateral_out(env, &config, &key.operator, payout);
        if cost > 0 {
            transfer_collateral_out(env, &config, cost_receiver, wad_min(value, cost));
        }
        emit_settle_position(env, key, payout);
        payout
    }
}

// ============================================================
// INTERNAL HELPERS
// ============================================================

fn require_not_expired(env: &Env, config: &PoolConfig) {
    if env.ledger().timestamp() >= config.maturity {
        panic!("{}", ErrorMsg::EXPIRED);
    }
}

fn require_expired(env: &Env, config: &PoolConfig) {
    if env.ledger().timestamp() < config.maturity {
        panic!("{}", ErrorMsg::NOT_EXPIRED);
    }
}

fn validate_range(lower: u128, upper: u128) {
    if !is_on_lattice(lower)
        || !is_on_lattice(upper)
        || lower < MIN_TICK_PRICE
        || upper > MAX_TICK_PRICE
        || lower >= upper
    {
        panic!("{}", ErrorMsg::INVALID_RANGE);
    }
}

/// The book is stranded when the market price is unset, or when the
/// active range is empty and the order sits inside that gap.
fn is_stranded(state: &PoolState, index: &Vec<u128>, lower: u128, upper: u128) -> bool {
    if state.market_price == 0 {
        return true;
    }
    if state.liquidity_rate != 0 {
        return false;
    }
    let gap_hi = match tick_index::next_above(index, state.current_tick) {
        Some(t) => t,
        None => MAX_TICK_PRICE,
    };
    lower >= state.current_tick && upper <= gap_hi
}

fn order_spec(config: &PoolConfig, key: &PositionKey) -> OrderSpec {
    OrderSpec {
        lower: key.lower,
        upper: key.upper,
        order_type: key.order_type,
        strike: config.strike,
        is_call: config.is_call,
    }
}

fn position_token_id(env: &Env, key: &PositionKey) -> u128 {
    let idx = operator_index(env, &key.operator);
    format_token_id(idx, key.lower, key.upper, key.order_type)
}

/// Per-tick liquidity for fee accounting. Unlike the deposit sizing
/// rule this truncates: transferred positions may carry sizes that do
/// not divide evenly.
fn per_tick(size: u128, lower: u128, upper: u128) -> u128 {
    size / strikepool_pricing::amount_of_ticks(lower, upper)
}

fn contracts_to_collateral(env: &Env, config: &PoolConfig, amount: u128) -> u128 {
    if config.is_call {
        amount
    } else {
        wad_mul(env, amount, config.strike)
    }
}

fn collateral_token(config: &PoolConfig) -> (Address, u32) {
    if config.is_call {
        (config.base.clone(), config.base_decimals)
    } else {
        (config.quote.clone(), config.quote_decimals)
    }
}

fn transfer_collateral_in(env: &Env, config: &PoolConfig, from: &Address, wad_amount: u128) {
    let (addr, decimals) = collateral_token(config);
    let amount = to_token_amount(wad_amount, decimals);
    if amount > 0 {
        token::Client::new(env, &addr).transfer(from, &env.current_contract_address(), &amount);
    }
}

fn transfer_collateral_out(env: &Env, config: &PoolConfig, to: &Address, wad_amount: u128) {
    let (addr, decimals) = collateral_token(config);
    let amount = to_token_amount(wad_amount, decimals);
    if amount > 0 {
        token::Client::new(env, &addr).transfer(&env.current_contract_address(), to, &amount);
    }
}

fn range_rate(env: &Env, state: &PoolState, lower: u128, upper: u128) -> u128 {
    let lower_tick = read_tick(env, lower);
    let upper_tick = read_tick(env, upper);
    range_fee_rate(
        state.global_fee_rate,
        state.current_tick,
        lower,
        upper,
        lower_tick.external_fee_rate,
        upper_tick.external_fee_rate,
    )
}

/// Create the tick record for `price` if absent and, when the deposit
/// opens a new position, count the reference to it. `hint` is an
/// advisory index entry at or below `price`; a zero or misplaced hint
/// falls back to the index search.
fn ensure_tick(
    env: &Env,
    index: &mut Vec<u128>,
    state: &PoolState,
    price: u128,
    hint: u128,
    count_reference: bool,
) {
    let present = matches!(
        tick_index::resolve_reference(index, hint, price),
        Some(found) if found == price
    );
    if present && !count_reference {
        return;
    }
    let mut tick = if present {
        read_tick(env, price)
    } else {
        match tick_index::insert(index, price) {
            Ok(()) => {}
            Err(msg) => panic!("{}", msg),
        }
        new_tick(price, state.current_tick, state.global_fee_rate)
    };
    if count_reference {
        tick.counter += 1;
    }
    write_tick(env, price, &tick);
}

/// Drop one position's reference to the tick at `price`; reclaim it
/// when no position references it anymore and crossing it would be a
/// no-op.
fn release_tick(env: &Env, index: &mut Vec<u128>, state: &mut PoolState, price: u128) {
    let mut tick = read_tick(env, price);
    if tick.counter > 0 {
        tick.counter -= 1;
    }
    if tick.is_removable() && price != MIN_TICK_PRICE && price != MAX_TICK_PRICE {
        match tick_index::remove(index, price) {
            Ok(()) => {}
            Err(msg) => panic!("{}", msg),
        }
        remove_tick(env, price);
        if state.current_tick == price {
            state.current_tick = match tick_index::prev_below(index, price) {
                Some(t) => t,
                None => MIN_TICK_PRICE,
            };
        }
    } else {
        write_tick(env, price, &tick);
    }
}

/// Fold a range order's liquidity change into the endpoint ticks and,
/// when the active range overlaps it, the live pool rates.
fn apply_range_liquidity(
    env: &Env,
    state: &mut PoolState,
    lower: u128,
    upper: u128,
    rate_delta: i128,
    order_type: OrderType,
) {
    let (long_delta, short_delta) = if order_type.is_bid() {
        (rate_delta, 0)
    } else {
        (0, rate_delta)
    };

    let mut lower_tick = read_tick(env, lower);
    apply_endpoint_delta(
        &mut lower_tick,
        lower,
        state.current_tick,
        rate_delta,
        long_delta,
        short_delta,
        true,
    );
    write_tick(env, lower, &lower_tick);

    let mut upper_tick = read_tick(env, upper);
    apply_endpoint_delta(
        &mut upper_tick,
        upper,
        state.current_tick,
        rate_delta,
        long_delta,
        short_delta,
        false,
    );
    write_tick(env, upper, &upper_tick);

    if lower <= state.current_tick && state.current_tick < upper {
        state.liquidity_rate = add_delta(state.liquidity_rate, rate_delta);
        state.long_rate = add_delta(state.long_rate, long_delta);
        state.short_rate = add_delta(state.short_rate, short_delta);
    }
}

/// Re-align `current_tick` with the market price, crossing at most
/// `MAX_RECONCILE_CROSSINGS` ticks. Needing more means the tick state
/// no longer matches the market price, which is unrecoverable.
fn reconcile(env: &Env, state: &mut PoolState, index: &Vec<u128>) {
    let mut crossings = 0u32;

    // upward: cross ticks strictly below the market price
    while let Some(next) = tick_index::next_above(index, state.current_tick) {
        if next >= state.market_price {
            break;
        }
        crossings += 1;
        if crossings > MAX_RECONCILE_CROSSINGS {
            panic!("{}", ErrorMsg::RECONCILE_BOUND);
        }
        let mut tick = read_tick(env, next);
        let (delta, long_delta, short_delta) = cross_tick(&mut tick, state.global_fee_rate);
        write_tick(env, next, &tick);
        state.liquidity_rate = add_delta(state.liquidity_rate, delta);
        state.long_rate = add_delta(state.long_rate, long_delta);
        state.short_rate = add_delta(state.short_rate, short_delta);
        state.current_tick = next;
    }

    // downward: cross the active range's lower bound while it exceeds
    // the market price
    while state.current_tick > state.market_price {
        crossings += 1;
        if crossings > MAX_RECONCILE_CROSSINGS {
            panic!("{}", ErrorMsg::RECONCILE_BOUND);
        }
        let at = state.current_tick;
        let mut tick = read_tick(env, at);
        let (delta, long_delta, short_delta) = cross_tick(&mut tick, state.global_fee_rate);
        write_tick(env, at, &tick);
        state.liquidity_rate = add_delta(state.liquidity_rate, delta);
        state.long_rate = add_delta(state.long_rate, long_delta);
        state.short_rate = add_delta(state.short_rate, short_delta);
        state.current_tick = match tick_index::prev_below(index, at) {
            Some(t) => t,
            None => MIN_TICK_PRICE,
        };
    }
}

/// Pull a (non-negative) composition delta from the operator: collateral
/// by token transfer, option legs through the internal ledger into pool
/// inventory.
fn pull_assets(env: &Env, config: &PoolConfig, from: &Address, delta: &Delta) {
    let this = env.current_contract_address();
    transfer_collateral_in(env, config, from, delta.collateral as u128);
    if delta.longs > 0 {
        sub_balance(env, from, LONG_TOKEN_ID, delta.longs as u128, ErrorMsg::INSUFFICIENT_LONGS);
        add_balance(env, &this, LONG_TOKEN_ID, delta.longs as u128);
    }
    if delta.shorts > 0 {
        sub_balance(env, from, SHORT_TOKEN_ID, delta.shorts as u128, ErrorMsg::INSUFFICIENT_SHORTS);
        add_balance(env, &this, SHORT_TOKEN_ID, delta.shorts as u128);
    }
}

/// Push a (non-positive) composition delta back to the operator.
fn push_assets(env: &Env, config: &PoolConfig, to: &Address, delta: &Delta) {
    let this = env.current_contract_address();
    transfer_collateral_out(env, config, to, delta.collateral.unsigned_abs());
    if delta.longs < 0 {
        sub_balance(env, &this, LONG_TOKEN_ID, delta.longs.unsigned_abs(), ErrorMsg::INSUFFICIENT_LONGS);
        add_balance(env, to, LONG_TOKEN_ID, delta.longs.unsigned_abs());
    }
    if delta.shorts < 0 {
        sub_balance(env, &this, SHORT_TOKEN_ID, delta.shorts.unsigned_abs(), ErrorMsg::INSUFFICIENT_SHORTS);
        add_balance(env, to, SHORT_TOKEN_ID, delta.shorts.unsigned_abs());
    }
}

/// Apply one party's side of a fill: net the option legs against the
/// party's balances, then settle collateral in a single transfer.
/// `premium_net` is positive when the party receives premium.
fn apply_party_fill(
    env: &Env,
    config: &PoolConfig,
    who: &Address,
    size: u128,
    is_buy: bool,
    premium_net: i128,
) {
    let long_balance = read_balance(env, who, LONG_TOKEN_ID);
    let short_balance = read_balance(env, who, SHORT_TOKEN_ID);
    let (long_change, short_change) = asset_delta(long_balance, short_balance, size, is_buy);

    // closing shorts releases their collateral, opening shorts locks it
    let mut collateral_net = premium_net;
    if short_change < 0 {
        collateral_net += to_signed(contracts_to_collateral(
            env,
            config,
            short_change.unsigned_abs(),
        ));
    } else if short_change > 0 {
        collateral_net -= to_signed(contracts_to_collateral(env, config, short_change as u128));
    }

    if long_change >= 0 {
        add_balance(env, who, LONG_TOKEN_ID, long_change as u128);
    } else {
        sub_balance(env, who, LONG_TOKEN_ID, long_change.unsigned_abs(), ErrorMsg::INSUFFICIENT_LONGS);
    }
    if short_change >= 0 {
        add_balance(env, who, SHORT_TOKEN_ID, short_change as u128);
    } else {
        sub_balance(env, who, SHORT_TOKEN_ID, short_change.unsigned_abs(), ErrorMsg::INSUFFICIENT_SHORTS);
    }

    if collateral_net > 0 {
        transfer_collateral_out(env, config, who, collateral_net as u128);
    } else if collateral_net < 0 {
        transfer_collateral_in(env, config, who, collateral_net.unsigned_abs());
    }
}

fn require_operator_authorized(env: &Env, config: &PoolConfig, user: &Address, operator: &Address) {
    if user == operator {
        return;
    }
    let settings = UserSettingsClient::new(env, &config.user_settings);
    if !settings.is_authorized(user, operator) {
        panic!("{}", ErrorMsg::NOT_AUTHORIZED);
    }
}

fn require_cost_authorized(env: &Env, config: &PoolConfig, user: &Address, cost: u128) {
    if cost == 0 {
        return;
    }
    let settings = UserSettingsClient::new(env, &config.user_settings);
    if cost > settings.authorized_cost(user) {
        panic!("{}", ErrorMsg::COST_TOO_HIGH);
    }
}

/// Fetch the oracle price at maturity once and freeze it.
fn settlement_price(env: &Env, config: &PoolConfig, state: &mut PoolState) -> u128 {
    if state.settlement_price != 0 {
        return state.settlement_price;
    }
    let adapter = OracleAdapterClient::new(env, &config.oracle_adapter);
    let spot = adapter.quote_from(&config.base, &config.quote, &config.maturity);
    if spot == 0 {
        panic!("{}", ErrorMsg::INVALID_ORACLE_PRICE);
    }
    state.settlement_price = spot;
    emit_settlement_price(env, spot);
    spot
}

/// Value of one long contract at the settlement price, in collateral
/// units: calls pay `(spot - strike) / spot` of the base token, puts
/// pay `strike - spot` of the quote token.
fn long_value(env: &Env, config: &PoolConfig, spot: u128) -> u128 {
    if config.is_call {
        if spot > config.strike {
            wad_div(env, spot - config.strike, spot)
        } else {
            0
        }
    } else if config.strike > spot {
        config.strike - spot
    } else {
        0
    }
}

/// Collateral returned per short contract after longs are paid.
fn short_residual(env: &Env, config: &PoolConfig, spot: u128) -> u128 {
    let locked = if config.is_call { WAD } else { config.strike };
    wad_sub(locked, long_value(env, config, spot))
}
