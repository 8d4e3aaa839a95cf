use formula_calc::{self as fc, FieldAccessors};
use proptest::prelude::*;
use rust_decimal::Decimal;

struct Ledger {
    interest: i64,
    labor: i64,
}

fn accessors() -> FieldAccessors<Ledger> {
    FieldAccessors::new()
        .with("interest", |l: &Ledger| l.interest.into())
        .with("labor", |l: &Ledger| l.labor.into())
}

proptest! {
    #[test]
    fn blank_formulas_are_zero(ws in "[ \t\r\n]{0,8}") {
        prop_assert_eq!(fc::eval_values(&ws, [("甲", 1)]).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn labels_match_direct_names(a in -10_000i64..10_000, b in -10_000i64..10_000) {
        let acc = accessors();
        let ledger = Ledger { interest: a, labor: b };
        let ev = fc::Evaluator::new();
        let titles = ["利息支出", "劳务费"];
        let names = ["interest", "labor"];
        let by_label = ev.eval_record(&titles, &names, "(利息支出-劳务费)*3", &acc.view(&ledger)).unwrap();
        let by_name = ev.eval_record(&titles, &names, "(interest-labor)*3", &acc.view(&ledger)).unwrap();
        prop_assert_eq!(by_label, by_name);
        prop_assert_eq!(by_label, Decimal::from((a - b) * 3));
    }

    #[test]
    fn logical_formulas_yield_one_or_zero(a in -100i64..100, b in -100i64..100) {
        let out = fc::eval_values("a>0 || b<=0", [("a", a), ("b", b)]).unwrap();
        let expected = if a > 0 || b <= 0 { Decimal::ONE } else { Decimal::ZERO };
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn absent_fields_count_as_zero(a in -1_000i64..1_000) {
        let record = serde_json::json!({ "interest": a });
        let out = fc::eval_record("interest,labor", "利息支出,劳务费", "利息支出+劳务费", &record).unwrap();
        prop_assert_eq!(out, Decimal::from(a));
    }
}
