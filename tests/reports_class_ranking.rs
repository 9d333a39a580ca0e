use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_assessd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn assessd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn numeric_upsert(
    student_id: &str,
    admission_no: &str,
    subject: &str,
    term: u8,
    mark: f64,
) -> serde_json::Value {
    json!({
        "teacherId": "t1",
        "studentId": student_id,
        "admissionNo": admission_no,
        "grade": "Grade 4",
        "subject": subject,
        "term": term,
        "scores": [
            { "strandNumber": 1, "subStrandName": "Whole numbers", "cat1": mark, "cat2": mark, "endTerm": mark }
        ]
    })
}

fn row_ids(report: &serde_json::Value) -> Vec<String> {
    report["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .map(|r| r["studentId"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn ranks(report: &serde_json::Value) -> Vec<u64> {
    report["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .map(|r| r["rank"].as_u64().unwrap_or_default())
        .collect()
}

#[test]
fn class_report_averages_ranks_and_honours_tie_setting() {
    let workspace = temp_dir("assessd-reports-ranking");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "roster.import",
        json!({
            "className": "Grade 4",
            "stream": "East",
            "students": [
                { "studentId": "s1", "fullName": "Wanjiru Kamau", "admissionNo": "1001" },
                { "studentId": "s2", "fullName": "Otieno Odhiambo", "admissionNo": "1002" },
                { "studentId": "s3", "fullName": "Achieng Atieno", "admissionNo": "1003" },
                { "studentId": "s4", "fullName": "Kiprono Bett", "admissionNo": "1004" },
                { "studentId": "s5", "fullName": "Left School", "admissionNo": "1005", "status": "withdrawn" }
            ],
            "subjects": ["Mathematics", "English"]
        }),
    );
    assert_eq!(imported["active"].as_u64(), Some(4));

    let upserts = [
        numeric_upsert("s1", "1001", "Mathematics", 1, 90.0),
        numeric_upsert("s1", "1001", "English", 1, 90.0),
        numeric_upsert("s2", "1002", "Mathematics", 1, 90.0),
        // Matched through the admission number.
        numeric_upsert("legacy-2", "1002", "English", 1, 90.0),
        numeric_upsert("s3", "1003", "Mathematics", 1, 70.0),
        // Other term; must not leak into term 1.
        numeric_upsert("s3", "1003", "English", 2, 100.0),
    ];
    for (i, params) in upserts.iter().enumerate() {
        let id = format!("u{}", i);
        let _ = request_ok(&mut stdin, &mut reader, &id, "assessments.upsert", params.clone());
    }
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "remarks.upsertOne",
        json!({ "studentId": "s1", "className": "grade 4", "stream": "east", "term": 1, "remark": "Excellent work" }),
    );

    let report = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "reports.classOpen",
        json!({ "className": "Grade 4", "stream": "East", "term": 1 }),
    );
    assert_eq!(report["rankTies"], json!("stable"));
    assert_eq!(report["studentCount"].as_u64(), Some(4));
    assert_eq!(row_ids(&report), vec!["s1", "s2", "s3", "s4"]);
    assert_eq!(ranks(&report), vec![1, 2, 3, 4]);

    // Composites go through their level: 90 is EE (100), 70 is ME (75).
    let rows = report["rows"].as_array().expect("rows");
    assert_eq!(rows[0]["overallAverage"].as_f64(), Some(100.0));
    assert_eq!(rows[0]["overallDisplay"], json!("100.0"));
    assert_eq!(rows[0]["overallGrade"], json!("A"));
    assert_eq!(rows[0]["overallLevel"], json!("EE"));
    assert_eq!(rows[0]["remark"], json!("Excellent work"));
    assert_eq!(rows[1]["subjects"][1]["average"].as_f64(), Some(100.0));

    let s3 = &rows[2];
    assert_eq!(s3["assessedSubjects"].as_u64(), Some(1));
    assert_eq!(s3["overallAverage"].as_f64(), Some(75.0));
    assert_eq!(s3["overallGrade"], json!("B"));
    assert_eq!(s3["overallLevel"], json!("EE"));
    assert!(s3["subjects"][1]["average"].is_null());
    assert_eq!(s3["subjects"][1]["display"], json!("—"));
    assert_eq!(s3["subjects"][1]["grade"], json!("—"));

    let s4 = &rows[3];
    assert!(s4["overallAverage"].is_null());
    assert_eq!(s4["overallDisplay"], json!("—"));
    assert!(s4["overallLevel"].is_null());

    let english = &report["subjectStats"][1];
    assert_eq!(english["subject"], json!("English"));
    assert_eq!(english["assessed"].as_u64(), Some(2));
    assert_eq!(english["total"].as_u64(), Some(4));
    assert_eq!(english["assessedRatio"], json!("2/4"));
    assert_eq!(english["highest"].as_f64(), Some(100.0));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "setup.update",
        json!({ "section": "reports", "patch": { "rankTies": "shared" } }),
    );
    let shared = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "reports.classOpen",
        json!({ "className": "Grade 4", "stream": "East", "term": 1 }),
    );
    assert_eq!(shared["rankTies"], json!("shared"));
    assert_eq!(ranks(&shared), vec![1, 1, 3, 4]);

    let overridden = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "reports.classOpen",
        json!({ "className": "Grade 4", "stream": "East", "term": 1, "rankTies": "stable" }),
    );
    assert_eq!(ranks(&overridden), vec![1, 2, 3, 4]);

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn descriptive_levels_are_scaled_onto_the_report_axis() {
    let workspace = temp_dir("assessd-reports-descriptive");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "roster.import",
        json!({
            "className": "Grade 1",
            "stream": "North",
            "students": [{ "studentId": "d1", "fullName": "Njeri Mwangi", "admissionNo": "2001" }],
            "subjects": ["Mathematics Activities"]
        }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "assessments.upsert",
        json!({
            "teacherId": "t2",
            "studentId": "d1",
            "grade": "Grade 1",
            "subject": "Mathematics Activities",
            "term": 1,
            "scores": [
                { "strandNumber": 1, "subStrandName": "Addition", "ee": true },
                { "strandNumber": 2, "subStrandName": "Length", "me": true },
                { "strandNumber": 2, "subStrandName": "Mass" }
            ]
        }),
    );

    let report = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "reports.classOpen",
        json!({ "className": "Grade 1", "stream": "North", "term": 1 }),
    );
    let row = &report["rows"][0];
    // (4 + 3) / 2 * 25; the unselected sub-strand carries no measurement.
    assert_eq!(row["subjects"][0]["average"].as_f64(), Some(87.5));
    assert_eq!(row["subjects"][0]["display"], json!("87.5"));
    assert_eq!(row["subjects"][0]["grade"], json!("A"));
    assert_eq!(row["rank"].as_u64(), Some(1));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
