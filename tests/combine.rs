//! End-to-end combine runs over sheets written to a temp directory.

use std::fs;
use std::path::Path;

use rbiclean::{
    combine_csvs, AbbreviationTable, Error, Normalizer, ProcessOptions, SubstitutionFilterSet,
};

const HEADER: &str = "BANK,IFSC,MICR,BRANCH,ADDRESS,CONTACT,CITY,DISTRICT,STATE\n";

fn write_sheet(dir: &Path, name: &str, rows: &[&str]) {
    let mut body = HEADER.to_string();
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(dir.join(name), body).unwrap();
}

fn read_master(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|row| row.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn normalizer() -> Normalizer {
    Normalizer::new(AbbreviationTable::builtin().unwrap())
}

#[test]
fn combines_sheets_in_file_order() {
    let src = tempfile::tempdir().unwrap();
    write_sheet(
        src.path(),
        "b_sbi.csv",
        &[concat!(
            r#"state bank of india,sbin0000001,400002001.0,"main branch,  main branch","#,
            r#""No.12 Opp Municipal Office Dist Chennai Pin 600001",044-12345678,"#,
            "chennai,ch,tamil nadu"
        )],
    );
    write_sheet(
        src.path(),
        "a_hdfc.csv",
        &[concat!(
            r#"HDFC BANK,HDFC0000060,411240002,PUNE - CAMP,"CAMP, PUNE 411 001","#,
            "12345,PUNE,PUNE,MAHARASHTRA"
        )],
    );

    let out = tempfile::tempdir().unwrap();
    let master = out.path().join("master.csv");
    let summary =
        combine_csvs(src.path(), &master, &normalizer(), &ProcessOptions::default()).unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(summary.rows_written, 2);
    assert_eq!(summary.rows_skipped, 0);

    let rows = read_master(&master);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].len(), 10);
    assert_eq!(rows[0][9], "ABBREVIATION");

    // a_hdfc.csv sorts first
    assert_eq!(
        rows[1],
        [
            "HDFC Bank", "HDFC0000060", "411240002", "Pune Camp", "Camp, Pune - 411001", "", "Pune",
            "Pune", "Maharashtra", "HDFC"
        ]
    );
    assert_eq!(
        rows[2],
        [
            "State Bank of India",
            "SBIN0000001",
            "400002001",
            "Main Branch",
            "No 12 Opp Municipal Office Chennai - 600001",
            "044-12345678",
            "Chennai",
            "Chennai",
            "Tamil Nadu",
            "SBI"
        ]
    );
}

#[test]
fn every_field_is_quoted() {
    let src = tempfile::tempdir().unwrap();
    write_sheet(
        src.path(),
        "one.csv",
        &["UCO BANK,UCBA0000001,700028002,KOLKATA,KOLKATA 700001,,KOLKATA,KOLKATA,WEST BENGAL"],
    );

    let master = src.path().join("out").with_extension("txt");
    combine_csvs(src.path(), &master, &normalizer(), &ProcessOptions::default()).unwrap();

    let content = fs::read_to_string(&master).unwrap();
    for line in content.lines() {
        assert!(line.starts_with('"') && line.ends_with('"'), "unquoted line: {line}");
        assert_eq!(line.matches("\",\"").count(), 9);
    }
}

#[test]
fn lenient_mode_skips_malformed_rows() {
    let src = tempfile::tempdir().unwrap();
    write_sheet(
        src.path(),
        "mixed.csv",
        &[
            "YES BANK,YESB0000001,,FORT,FORT MUMBAI 400001,,MUMBAI,MUMBAI,MAHARASHTRA",
            "YES BANK,YESB0000002,,TRUNCATED",
        ],
    );
    let master = src.path().join("master.csv");

    let err = combine_csvs(src.path(), &master, &normalizer(), &ProcessOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::FieldCount { found: 4, line: 3, .. }));

    let summary =
        combine_csvs(src.path(), &master, &normalizer(), &ProcessOptions::new().lenient())
            .unwrap();
    assert_eq!(summary.rows_written, 1);
    assert_eq!(summary.rows_skipped, 1);
}

#[test]
fn failed_run_keeps_previous_master() {
    let src = tempfile::tempdir().unwrap();
    write_sheet(
        src.path(),
        "a.csv",
        &["YES BANK,YESB0000001,,FORT,FORT 400001,,MUMBAI,MUMBAI,MAHARASHTRA"],
    );
    write_sheet(
        src.path(),
        "b.csv",
        &["UCO BANK,UCBA0000001,,KOLKATA,KOLKATA 700001,,KOLKATA,KOLKATA,WEST BENGAL"],
    );

    let out = tempfile::tempdir().unwrap();
    let master = out.path().join("master.csv");
    combine_csvs(src.path(), &master, &normalizer(), &ProcessOptions::default()).unwrap();
    let before = fs::read_to_string(&master).unwrap();
    assert_eq!(read_master(&master).len(), 3);

    write_sheet(src.path(), "b.csv", &["UCO BANK,UCBA0000001,,KOLKATA"]);
    let err = combine_csvs(src.path(), &master, &normalizer(), &ProcessOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::FieldCount { found: 4, line: 2, .. }));

    assert_eq!(fs::read_to_string(&master).unwrap(), before);
    // The staged file is cleaned up on failure
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
}

#[test]
fn master_inside_source_is_not_reread() {
    let src = tempfile::tempdir().unwrap();
    write_sheet(
        src.path(),
        "sheet.csv",
        &["YES BANK,YESB0000001,,FORT,FORT 400001,,MUMBAI,MUMBAI,MAHARASHTRA"],
    );
    let master = src.path().join("master.csv");
    let options = ProcessOptions::default();

    let first = combine_csvs(src.path(), &master, &normalizer(), &options).unwrap();
    let second = combine_csvs(src.path(), &master, &normalizer(), &options).unwrap();

    assert_eq!(first, second);
    assert_eq!(second.files, 1);
    assert_eq!(read_master(&master).len(), 2);
}

#[test]
fn filters_from_json_file() {
    let src = tempfile::tempdir().unwrap();
    write_sheet(
        src.path(),
        "sheet.csv",
        &["YES BANK,YESB0000001,,FORT,FORT 400001,,BOMBAY,BOMBAY,MAHARASHTRA"],
    );

    let filters_path = src.path().join("filters.json");
    fs::write(
        &filters_path,
        r#"{"replace": [["*", "Bombay", "Mumbai"], ["CITY", "Fort", "Kote"]]}"#,
    )
    .unwrap();
    let filters = SubstitutionFilterSet::from_path(&filters_path).unwrap();

    let out = tempfile::tempdir().unwrap();
    let master = out.path().join("master.csv");
    combine_csvs(
        src.path(),
        &master,
        &normalizer().with_filters(filters.clone()),
        &ProcessOptions::default(),
    )
    .unwrap();

    let rows = read_master(&master);
    assert_eq!(rows[1][3], "Fort");
    assert_eq!(rows[1][6], "Mumbai");
    assert_eq!(rows[1][7], "Mumbai");

    combine_csvs(
        src.path(),
        &master,
        &normalizer().with_filters(filters),
        &ProcessOptions::new().with_filters_enabled(false),
    )
    .unwrap();
    assert_eq!(read_master(&master)[1][6], "Bombay");
}

#[test]
fn missing_directory_is_reported() {
    let out = tempfile::tempdir().unwrap();
    let err = combine_csvs(
        out.path().join("nope"),
        out.path().join("master.csv"),
        &normalizer(),
        &ProcessOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::NotADirectory(_)));
}
