use formula_calc as fc;
use rust_decimal::Decimal;
use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a subscriber that writes WARN and above into a buffer.
fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, String) {
    let sink = Captured::default();
    let writer = sink.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logged = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
    (out, logged)
}

#[test]
fn test_blank_formula_warns() {
    let (out, logged) = capture_warnings(|| fc::eval_values("  ", [("a", 1)]));
    assert_eq!(out.unwrap(), Decimal::ZERO);
    assert!(logged.contains("WARN"), "{logged}");
    assert!(logged.contains("blank formula"), "{logged}");
}

#[test]
fn test_missing_field_warning_names_field_and_formula() {
    let record = json!({"interestExpense": 400});
    let (out, logged) = capture_warnings(|| {
        fc::eval_record("interestExpense,laborCost", "利息支出,劳务费", "利息支出+劳务费", &record)
    });
    assert_eq!(out.unwrap(), Decimal::from(400));
    let line = logged
        .lines()
        .find(|l| l.contains("laborCost") && l.contains("WARN"))
        .unwrap_or_else(|| panic!("no warning for laborCost in {logged:?}"));
    assert!(line.contains("Absent"), "{line}");
    assert!(line.contains("利息支出+劳务费"), "{line}");
    assert!(line.contains("(interestExpense+laborCost)*1"), "{line}");
}

#[test]
fn test_readable_fields_stay_quiet() {
    let (out, logged) = capture_warnings(|| fc::eval_values("甲+乙", [("甲", 1), ("乙", 2)]));
    assert_eq!(out.unwrap(), Decimal::from(3));
    assert!(logged.is_empty(), "{logged}");
}
