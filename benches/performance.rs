use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use snapbooks_core::{calculate_metrics, period_totals, ReportService};
use snapbooks_domain::{
    Books, DateWindow, Expense, ExpenseCategory, Money, PaymentType, Print, Session,
    SessionStatus, WeeklySalaryEntry, Worker,
};
use snapbooks_storage_json::{load_books_from_path, save_books_to_path};
use tempfile::tempdir;

fn build_sample_books(session_count: usize) -> Books {
    let mut books = Books::new("Benchmark");
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    let worker = books.add_worker(Worker::new(
        "Mara",
        PaymentType::PerSession,
        Money::from_major(25),
    ));

    for idx in 0..session_count {
        let date = start + Duration::days((idx % 365) as i64);
        let mut session = Session::new(
            format!("Client {}", idx % 500),
            date,
            Money::from_cents(9_000 + (idx % 100) as i64 * 50),
        )
        .with_photographer("Mara")
        .with_photo_count((idx % 60) as u32);
        if idx % 3 != 0 {
            session = session.with_status(SessionStatus::Delivered);
        }
        let session_id = books.add_session(session);

        if idx % 4 == 0 {
            let mut print = Print::new(
                format!("Client {}", idx % 500),
                date,
                Money::from_major(40),
                Money::from_major(15),
            );
            if idx % 8 == 0 {
                print.mark_delivered(date + Duration::days(3));
            }
            books.add_print(print);
        }
        if idx % 5 == 0 {
            books.add_expense(
                Expense::new(date, ExpenseCategory::Fuel, Money::from_cents(1_250))
                    .for_session(session_id),
            );
        }
    }

    for week in 0..52 {
        let window = DateWindow::week_containing(start + Duration::weeks(week));
        let mut entry = WeeklySalaryEntry::new(worker, "Mara", window.start, window.end)
            .with_amounts(Money::ZERO, Money::from_major(250));
        if week % 2 == 0 {
            entry.mark_paid(window.end);
        }
        books.add_salary(entry);
    }
    books
}

fn bench_books_io(c: &mut Criterion) {
    let books = build_sample_books(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("books.json");

    c.bench_function("books_save_10k", |b| {
        b.iter(|| {
            save_books_to_path(&books, &file_path).expect("save books");
        })
    });

    save_books_to_path(&books, &file_path).expect("seed");

    c.bench_function("books_load_10k", |b| {
        b.iter(|| {
            let loaded = load_books_from_path(&file_path).expect("load books");
            black_box(loaded);
        })
    });
}

fn bench_metrics(c: &mut Criterion) {
    let books = build_sample_books(black_box(10_000));
    let reference = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    c.bench_function("metrics_10k", |b| {
        b.iter(|| black_box(calculate_metrics(&books, reference)))
    });

    c.bench_function("month_period_totals", |b| {
        b.iter(|| black_box(period_totals(&books, DateWindow::month_containing(reference))))
    });

    c.bench_function("weekly_breakdown", |b| {
        b.iter(|| black_box(ReportService::weekly_breakdown(&books, reference)))
    });
}

criterion_group!(benches, bench_books_io, bench_metrics);
criterion_main!(benches);
