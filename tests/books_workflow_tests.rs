mod common;

use chrono::NaiveDate;
use regex::Regex;
use snapbooks::core::BooksError;
use snapbooks_core::{
    DebtService, ExpenseService, MetricsEngine, PayrollService, PrintService, ReportService,
    SessionService, WorkerService,
};
use snapbooks_domain::{
    DateWindow, Debt, Expense, ExpenseCategory, Money, PaymentType, Print, Session,
    SessionStatus, Worker,
};

use common::setup_test_env;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
}

#[test]
fn a_studio_week_adds_up() {
    let (mut manager, _, _) = setup_test_env();
    manager.open("studio").expect("open");

    let ana = manager
        .update(|books| {
            SessionService::add(
                books,
                Session::new("Ana", date(5), Money::from_major(150))
                    .with_photographer("Mara")
                    .with_status(SessionStatus::Delivered),
            )
        })
        .unwrap();
    manager
        .update(|books| {
            SessionService::add(
                books,
                Session::new("Bo", date(6), Money::from_major(90)).with_photographer("Mara"),
            )
        })
        .unwrap();

    let delivered = manager
        .update(|books| {
            PrintService::add(
                books,
                Print::new("Ana", date(5), Money::from_major(50), Money::from_major(20)),
            )
        })
        .unwrap();
    manager
        .update(|books| PrintService::deliver(books, delivered, date(7)))
        .unwrap();
    manager
        .update(|books| {
            PrintService::add(
                books,
                Print::new("Cy", date(6), Money::from_major(30), Money::from_major(12)),
            )
        })
        .unwrap();

    let mara = manager
        .update(|books| {
            WorkerService::add(
                books,
                Worker::new("Mara", PaymentType::PerSession, Money::from_major(25)),
            )
        })
        .unwrap();
    let entry = PayrollService::draft_entry(
        manager.current().unwrap(),
        mara,
        DateWindow::week_containing(date(7)),
    )
    .unwrap();
    assert_eq!(entry.generated_amount, Money::from_major(50));
    let salary = manager
        .update(|books| PayrollService::add(books, entry))
        .unwrap();
    manager
        .update(|books| PayrollService::mark_paid(books, salary, date(11)))
        .unwrap();

    manager
        .update(|books| {
            ExpenseService::add(
                books,
                Expense::new(date(6), ExpenseCategory::Fuel, Money::from_major(10)).for_session(ana),
            )
        })
        .unwrap();
    manager
        .update(|books| {
            ExpenseService::add(
                books,
                Expense::new(
                    NaiveDate::from_ymd_opt(2025, 4, 20).unwrap(),
                    ExpenseCategory::Props,
                    Money::from_major(40),
                ),
            )
        })
        .unwrap();
    manager
        .update(|books| DebtService::add(books, Debt::new("Rosa", Money::from_major(40), date(2))))
        .unwrap();

    let books = manager.current().unwrap();
    let metrics = MetricsEngine::at(books, date(7));
    assert_eq!(metrics.delivered_revenue, Money::from_major(200));
    assert_eq!(metrics.total_received, Money::from_major(320));
    assert_eq!(metrics.print_reserve, Money::from_major(18));
    assert_eq!(metrics.total_expenses, Money::from_major(50));
    assert_eq!(metrics.total_salaries, Money::from_major(50));
    assert_eq!(metrics.real_profit, Money::from_major(80));
    assert_eq!(metrics.expected_bank_balance, Money::from_major(188));
    assert_eq!(metrics.weekly_profit, Money::from_major(120));
    assert_eq!(metrics.monthly_profit, Money::from_major(120));

    let counts = ReportService::dashboard_counts(books);
    assert_eq!(counts.delivered_sessions, 1);
    assert_eq!(counts.undelivered_prints, 1);
    assert_eq!(counts.open_debts, 1);
}

#[test]
fn removing_a_session_unlinks_its_expenses_on_disk() {
    let (mut manager, _, _) = setup_test_env();
    manager.open("studio").unwrap();
    let session = manager
        .update(|books| SessionService::add(books, Session::new("Ana", date(5), Money::from_major(100))))
        .unwrap();
    manager
        .update(|books| {
            ExpenseService::add(
                books,
                Expense::new(date(5), ExpenseCategory::Decoration, Money::from_major(15))
                    .for_session(session),
            )
        })
        .unwrap();
    manager
        .update(|books| SessionService::remove(books, session))
        .unwrap();

    manager.open("studio").unwrap();
    let books = manager.current().unwrap();
    assert!(books.sessions.is_empty());
    assert_eq!(books.expenses[0].session_id, None);
    assert!(manager.warnings().unwrap().is_empty());
}

#[test]
fn backups_are_named_by_books_and_timestamp() {
    let (mut manager, _, _) = setup_test_env();
    manager.open("Studio North").unwrap();
    let plain = manager.backup(None).expect("backup");
    let noted = manager.backup(Some("Before import!")).expect("noted backup");

    let pattern = Regex::new(r"^studio_north_\d{8}_\d{4}(_[a-z0-9-]+)?\.json$").unwrap();
    assert!(pattern.is_match(&plain.id), "{}", plain.id);
    assert!(pattern.is_match(&noted.id), "{}", noted.id);
    assert!(noted.id.contains("before-import"), "{}", noted.id);
    assert!(!manager.list_backups().unwrap().is_empty());
}

#[test]
fn saving_under_a_new_name_keeps_both_books() {
    let (mut manager, _, base) = setup_test_env();
    manager.open("studio").unwrap();
    manager
        .update(|books| SessionService::add(books, Session::new("Ana", date(5), Money::from_major(100))))
        .unwrap();
    manager.save_as("studio copy").unwrap();
    assert_eq!(manager.current_name(), Some("studio copy"));
    assert_eq!(manager.list_books().unwrap().len(), 2);

    let export = base.join("export.json");
    manager.export_to(&export).unwrap();
    assert!(export.exists());
    assert!(matches!(manager.save_as("  "), Err(BooksError::InvalidInput(_))));
}

#[test]
fn legacy_exports_become_active_books() {
    let (mut manager, _, _) = setup_test_env();
    let json = r#"{
      "sessions": [
        {"id": "s1", "clientName": "Lucia", "date": "2025-03-10", "price": 150,
         "photographer": "Mara", "status": "entregada"}
      ],
      "expenses": [
        {"id": "e1", "date": "2025-03-10", "type": "gasolina", "amount": 5, "sessionId": "s1"},
        {"id": "e2", "date": "03/10/2025", "type": "ropa", "amount": 5}
      ]
    }"#;
    let warnings = manager.import_legacy(json, "imported").expect("import");
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].contains("expense #2 has invalid date"));

    let books = manager.current().unwrap();
    assert_eq!(books.expenses.len(), 2);
    assert_eq!(books.expenses[1].date, None);
    let metrics = MetricsEngine::at(books, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
    assert_eq!(metrics.total_expenses, Money::from_major(10));
    assert_eq!(metrics.weekly_profit, Money::from_major(145));
    assert_eq!(manager.current_name(), Some("imported"));
    assert_eq!(books.sessions[0].status, SessionStatus::Delivered);
    assert_eq!(books.expenses[0].session_id, Some(books.sessions[0].id));
    assert_eq!(manager.list_books().unwrap(), vec!["imported".to_string()]);
}
