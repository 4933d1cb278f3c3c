//! Scenario-based integration tests.
//! Generates random sessions mixing all record kinds with malformed lines and compares the report
//! against an independent replay of the same events.


use proptest::prelude::*;
use rust_decimal::Decimal;
use sales_analyzer::{Error, Report, analyze, analyze_parallel};
use scenario::{Event, NAMES, Session};

const GARBAGE: [&str; 7] = [
    "",
    "hello world",
    "004ç1ç2ç3",
    "001ç123çPedro",
    "003ç10ç[]çPedro",
    "001ç1çPedroç-5",
    "002ç1çAcmeçRuralç",
];

fn money(max_cents: i64) -> impl Strategy<Value = Decimal> {
    (0..max_cents).prop_map(|cents| Decimal::new(cents, 2))
}

/// Any amount representable as `Money`, mostly too large to be summed twice.
fn large_money() -> impl Strategy<Value = Decimal> {
    (0i128..(1i128 << 96), 0u32..=4)
        .prop_map(|(mantissa, scale)| Decimal::from_i128_with_scale(mantissa, scale))
}

fn event() -> impl Strategy<Value = Event> {
    let name = 0..NAMES.len();
    prop_oneof![
        1 => (name.clone(), money(1_000_000))
            .prop_map(|(name, salary)| Event::Salesperson { name, salary }),
        1 => name.clone().prop_map(|name| Event::Client { name }),
        3 => (
            0u64..1_000,
            name,
            prop::collection::vec(money(100_000), 1..=4)
        )
            .prop_map(|(sale_id, salesperson, prices)| Event::Sale {
                sale_id,
                salesperson,
                prices
            }),
        1 => prop::sample::select(GARBAGE.to_vec()).prop_map(|line| Event::Garbage(line.to_string())),
    ]
}

fn session() -> impl Strategy<Value = Session> {
    prop::collection::vec(event(), 0..60).prop_map(|events| Session { events })
}

fn large_amount_session() -> impl Strategy<Value = Session> {
    let name = 0..NAMES.len();
    let event = prop_oneof![
        (name.clone(), large_money())
            .prop_map(|(name, salary)| Event::Salesperson { name, salary }),
        (
            0u64..1_000,
            name,
            prop::collection::vec(large_money(), 1..=3)
        )
            .prop_map(|(sale_id, salesperson, prices)| Event::Sale {
                sale_id,
                salesperson,
                prices
            }),
    ];
    prop::collection::vec(event, 0..30).prop_map(|events| Session { events })
}

/// Number of sales whose own total does not fit into `Decimal`.
fn overflowing_sales(session: &Session) -> usize {
    session
        .events
        .iter()
        .filter(|event| match event {
            Event::Sale { prices, .. } => prices
                .iter()
                .try_fold(Decimal::ZERO, |total, price| total.checked_add(*price))
                .is_none(),
            _ => false,
        })
        .count()
}

fn run(session: &Session) -> (Report, Vec<Error>) {
    let input = session.to_input();
    let mut errors = Vec::new();
    let report = analyze(input.as_bytes(), |e| errors.push(e)).unwrap();
    (report, errors)
}

proptest! {
    #[test]
    fn report_matches_replayed_events(session in session()) {
        let (report, errors) = run(&session);

        prop_assert_eq!(report, session.expected_report());
        prop_assert_eq!(errors.len(), session.garbage_count());
    }

    #[test]
    fn parallel_report_agrees_on_order_independent_fields(
        session in session(),
        num_workers in 1usize..=4,
    ) {
        let input = session.to_input();
        let expected = session.expected_report();

        let mut errors = Vec::new();
        let report = analyze_parallel(input.as_bytes(), |e| errors.push(e), num_workers).unwrap();

        prop_assert_eq!(report.client_count, expected.client_count);
        prop_assert_eq!(report.salesperson_count, expected.salesperson_count);
        prop_assert_eq!(errors.len(), session.garbage_count());
        // equal totals may be aggregated in either order, so only the total is comparable
        prop_assert_eq!(
            sale_total(&session, report.most_expensive_sale_id),
            sale_total(&session, expected.most_expensive_sale_id)
        );
    }
}

proptest! {
    #[test]
    fn amounts_up_to_the_decimal_limit_never_abort_the_analysis(
        session in large_amount_session(),
        num_workers in 1usize..=4,
    ) {
        let input = session.to_input();
        let salespeople = session
            .events
            .iter()
            .filter(|e| matches!(e, Event::Salesperson { .. }))
            .count() as u64;

        let mut errors = Vec::new();
        let report = analyze(input.as_bytes(), |e| errors.push(e)).unwrap();
        prop_assert_eq!(report.salesperson_count, salespeople);
        prop_assert_eq!(errors.len(), overflowing_sales(&session));

        let mut errors = Vec::new();
        let report = analyze_parallel(input.as_bytes(), |e| errors.push(e), num_workers).unwrap();
        prop_assert_eq!(report.salesperson_count, salespeople);
        prop_assert_eq!(errors.len(), overflowing_sales(&session));
    }
}

/// Highest total among the sales carrying `sale_id`, zero when there is none.
fn sale_total(session: &Session, sale_id: u64) -> Decimal {
    session
        .events
        .iter()
        .filter_map(|event| match event {
            Event::Sale {
                sale_id: id,
                prices,
                ..
            } if *id == sale_id => Some(prices.iter().sum::<Decimal>()),
            _ => None,
        })
        .max()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests for the test infrastructure itself
// ---------------------------------------------------------------------------

mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn events_render_in_the_input_grammar() {
        let session = Session {
            events: vec![
                Event::Salesperson {
                    name: 0,
                    salary: dec!(1200.50),
                },
                Event::Client { name: 1 },
                Event::Sale {
                    sale_id: 7,
                    salesperson: 0,
                    prices: vec![dec!(10), dec!(2.5)],
                },
            ],
        };

        let (report, errors) = run(&session);

        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(report, session.expected_report());
        assert_eq!(report.top_ratio_salesperson.as_deref(), Some("Pedro"));
    }

    #[test]
    fn every_garbage_line_is_rejected() {
        let session = Session {
            events: GARBAGE
                .iter()
                .map(|line| Event::Garbage(line.to_string()))
                .collect(),
        };

        let (report, errors) = run(&session);

        assert_eq!(errors.len(), GARBAGE.len());
        assert_eq!(report, Report::default());
    }

    #[test]
    fn model_ignores_sales_of_unknown_salespeople() {
        let session = Session {
            events: vec![
                Event::Sale {
                    sale_id: 1,
                    salesperson: 2,
                    prices: vec![dec!(5)],
                },
                Event::Salesperson {
                    name: 2,
                    salary: dec!(100),
                },
            ],
        };

        let expected = session.expected_report();

        assert_eq!(expected.most_expensive_sale_id, 1);
        assert_eq!(expected.top_ratio_salesperson, None);
        assert_eq!(run(&session).0, expected);
    }
}
