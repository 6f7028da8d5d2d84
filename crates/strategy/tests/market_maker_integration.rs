//! Integration test: Market Maker against order depth fixtures
//!
//! Tests the complete flow:
//! 1. Snapshot provides resting liquidity
//! 2. Market maker estimates fair value
//! 3. Take / clear / make phases produce orders
//! 4. Positions feed back into the next tick and orders stay within limits

use archipelago_core::{Order, OrderDepth, TradingState};
use archipelago_strategy::{
    BookWalk, FairValuePolicy, LiquidationMode, LiquidationPolicy, MarketMaker,
    MarketMakerConfig, Phase, QuotingPolicy, RecordingSink, Skip, Strategy, TakeClearMake,
    TickContext,
};
use rust_decimal_macros::dec;

const RESIN: &str = "RAINFOREST_RESIN";

fn resin_maker(take_width: i64, edge_width: i64) -> MarketMaker {
    MarketMaker::new(MarketMakerConfig {
        symbol: RESIN.to_string(),
        fair_value: FairValuePolicy::Constant { value: dec!(10000) },
        quoting: QuotingPolicy::TakeClearMake(TakeClearMake::new(
            take_width.into(),
            edge_width.into(),
        )),
        liquidation: LiquidationPolicy::Disabled,
    })
}

fn run(
    strategy: &mut dyn Strategy,
    state: &TradingState,
    symbol: &str,
    sink: &mut RecordingSink,
) -> Vec<Order> {
    let ctx = TickContext::new(state, symbol, 50);
    strategy.run(&ctx, sink)
}

#[test]
fn test_empty_book_produces_no_orders() {
    let _ = env_logger::try_init();

    let mut mm = resin_maker(1, 2);
    let state = TradingState::new(0).with_depth(RESIN, OrderDepth::new());
    let mut sink = RecordingSink::new();

    assert!(run(&mut mm, &state, RESIN, &mut sink).is_empty());
    assert_eq!(sink.skips_for(RESIN), vec![&Skip::EmptyBook(RESIN.into())]);
}

#[test]
fn test_crossed_band_takes_only() {
    let _ = env_logger::try_init();

    let mut mm = resin_maker(1, 2);
    let depth = OrderDepth::new().with_bid(10005, 50).with_ask(9995, 50);
    let state = TradingState::new(0).with_depth(RESIN, depth);
    let mut sink = RecordingSink::new();

    let orders = run(&mut mm, &state, RESIN, &mut sink);
    assert_eq!(
        orders,
        vec![Order::buy(RESIN, 9995, 50), Order::sell(RESIN, 10005, 50)]
    );
    assert_eq!(sink.phases_for(RESIN), vec![Phase::Take, Phase::Take]);
}

#[test]
fn test_wide_spread_makes_only() {
    let _ = env_logger::try_init();

    let mut mm = resin_maker(1, 2);
    let depth = OrderDepth::new().with_bid(9990, 10).with_ask(10010, 10);
    let state = TradingState::new(0).with_depth(RESIN, depth);
    let mut sink = RecordingSink::new();

    let orders = run(&mut mm, &state, RESIN, &mut sink);
    assert_eq!(
        orders,
        vec![Order::buy(RESIN, 9991, 50), Order::sell(RESIN, 10009, 50)]
    );
    assert_eq!(sink.phases_for(RESIN), vec![Phase::Make, Phase::Make]);
    assert!(orders[0].price < orders[1].price);
}

#[test]
fn test_position_feeds_back_into_capacity() {
    let _ = env_logger::try_init();

    let mut mm = resin_maker(1, 2);
    let depth = OrderDepth::new()
        .with_bid(10000, 30)
        .with_bid(9996, 10)
        .with_ask(9998, 30)
        .with_ask(10004, 10);
    let mut sink = RecordingSink::new();

    // Tick 1: flat, take the cheap ask and clear some at fair
    let state = TradingState::new(0).with_depth(RESIN, depth.clone());
    let first = run(&mut mm, &state, RESIN, &mut sink);
    assert_eq!(first[0], Order::buy(RESIN, 9998, 30));
    assert_eq!(first[1], Order::sell(RESIN, 10000, 30));

    // Tick 2: long 45 after fills, at most 5 more can be bought
    let state = TradingState::new(100)
        .with_depth(RESIN, depth)
        .with_position(RESIN, 45);
    let second = run(&mut mm, &state, RESIN, &mut sink);
    let bought: i64 = second.iter().filter(|o| o.quantity > 0).map(|o| o.quantity).sum();
    let sold: i64 = second.iter().filter(|o| o.quantity < 0).map(|o| -o.quantity).sum();
    assert_eq!(bought, 5);
    assert!(sold <= 95);
}

#[test]
fn test_kelp_regression_market_maker() {
    let _ = env_logger::try_init();

    let mut mm = MarketMaker::new(MarketMakerConfig {
        symbol: "KELP".to_string(),
        fair_value: FairValuePolicy::LinearRegression {
            window: 10,
            require_full_window: false,
        },
        quoting: QuotingPolicy::TakeClearMake(TakeClearMake::new(dec!(1), dec!(1))),
        liquidation: LiquidationPolicy::Disabled,
    });
    let mut sink = RecordingSink::new();

    for (i, mid) in [2000, 2002, 2004].into_iter().enumerate() {
        let state = TradingState::new(i as i64 * 100).with_depth(
            "KELP",
            OrderDepth::new().with_bid(mid - 3, 20).with_ask(mid + 3, 20),
        );
        run(&mut mm, &state, "KELP", &mut sink);
    }
    assert_eq!(sink.fair_value("KELP"), Some(dec!(2006)));
}

#[test]
fn test_squid_book_walk_liquidates_when_pinned() {
    let _ = env_logger::try_init();

    let mut mm = MarketMaker::new(MarketMakerConfig {
        symbol: "SQUID_INK".to_string(),
        fair_value: FairValuePolicy::PopularMidpoint,
        quoting: QuotingPolicy::BookWalk(BookWalk::default()),
        liquidation: LiquidationPolicy::pinned_window(),
    });
    let depth = OrderDepth::new().with_bid(1998, 20).with_ask(2002, 20);
    let mut sink = RecordingSink::new();

    for i in 0..10 {
        let state = TradingState::new(i * 100)
            .with_depth("SQUID_INK", depth.clone())
            .with_position("SQUID_INK", 50);
        let orders = run(&mut mm, &state, "SQUID_INK", &mut sink);
        assert!(orders.iter().all(|o| o.quantity < 0), "pinned long never buys");
    }
    assert_eq!(sink.liquidations(), vec![LiquidationMode::Hard]);
    assert!(sink.phases_for("SQUID_INK").contains(&Phase::Liquidate));
}

#[test]
fn test_squid_book_walk_liquidates_when_pinned_short() {
    let _ = env_logger::try_init();

    let mut mm = MarketMaker::new(MarketMakerConfig {
        symbol: "SQUID_INK".to_string(),
        fair_value: FairValuePolicy::PopularMidpoint,
        quoting: QuotingPolicy::BookWalk(BookWalk::default()),
        liquidation: LiquidationPolicy::pinned_window(),
    });
    let depth = OrderDepth::new().with_bid(1998, 20).with_ask(2002, 20);
    let mut sink = RecordingSink::new();

    let pinned_short = |timestamp: i64| {
        TradingState::new(timestamp)
            .with_depth("SQUID_INK", depth.clone())
            .with_position("SQUID_INK", -50)
    };
    for i in 0..9 {
        let orders = run(&mut mm, &pinned_short(i * 100), "SQUID_INK", &mut sink);
        assert!(orders.iter().all(|o| o.quantity > 0), "pinned short never sells");
    }
    assert!(sink.liquidations().is_empty());

    let last = run(&mut mm, &pinned_short(900), "SQUID_INK", &mut sink);
    assert!(last.iter().all(|o| o.quantity > 0));
    assert_eq!(sink.liquidations(), vec![LiquidationMode::Hard]);
    // Half the room bought back at fair, then half the rest below it
    assert_eq!(last[0], Order::buy("SQUID_INK", 2000, 50));
    assert_eq!(last[1], Order::buy("SQUID_INK", 1998, 25));
}

#[test]
fn test_make_quotes_never_cross() {
    let _ = env_logger::try_init();

    let edges = [dec!(1), dec!(1.5), dec!(2), dec!(3.5)];
    let fair_values = [dec!(10000), dec!(10000.25), dec!(10000.5), dec!(10000.75)];

    for edge in edges {
        for fair_value in fair_values {
            for gap in 1..=4 {
                let mut mm = MarketMaker::new(MarketMakerConfig {
                    symbol: RESIN.to_string(),
                    fair_value: FairValuePolicy::Constant { value: fair_value },
                    quoting: QuotingPolicy::TakeClearMake(TakeClearMake::new(dec!(100), edge)),
                    liquidation: LiquidationPolicy::Disabled,
                });
                let depth = OrderDepth::new()
                    .with_bid(10000 - gap, 20)
                    .with_ask(10001 + gap, 20);
                let state = TradingState::new(0).with_depth(RESIN, depth);
                let mut sink = RecordingSink::new();

                let orders = run(&mut mm, &state, RESIN, &mut sink);
                assert_eq!(orders.len(), 2, "edge {} fv {} gap {}", edge, fair_value, gap);
                let (bid, ask) = (orders[0].price, orders[1].price);
                assert!(
                    bid < ask,
                    "edge {} fv {} gap {}: bid {} ask {}",
                    edge,
                    fair_value,
                    gap,
                    bid,
                    ask
                );
            }
        }
    }
}
