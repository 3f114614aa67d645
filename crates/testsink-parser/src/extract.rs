//! Extractors over a parsed report document.

use crate::error::ParseResult;
use roxmltree::{Document, Node};
use testsink_core::{StepRecord, UutReport, NO_DATA};

/// Text prefix marking a step as a nested test-primitive call.
const CALL_PREFIX: &str = "Call Test Primitive (";

/// Parse a report document and extract every field the load pipeline needs.
///
/// Missing fields degrade to the [`NO_DATA`] sentinel (scalars) or are
/// dropped (steps without an identity); only malformed XML is an error.
pub fn parse_report(xml: &str) -> ParseResult<UutReport> {
    let doc = Document::parse(xml)?;

    Ok(UutReport {
        model_number: prop_text(&doc, "ModelNumber"),
        serial_number: prop_text(&doc, "SerialNumber"),
        station_id: prop_text(&doc, "StationID"),
        sequence_version: prop_text(&doc, "Test Sequence Version"),
        operator: prop_text(&doc, "LoginName"),
        start_date: start_date(&doc),
        start_time: start_time(&doc),
        end_date: end_date(&doc),
        end_time: end_time(&doc),
        result: uut_result(&doc),
        steps: call_test_primitive_steps(&doc),
    })
}

/// Whole text content of the first `Prop` anywhere in the tree whose trimmed
/// `Name` attribute equals `name`, or the sentinel if there is none.
pub fn prop_text(doc: &Document, name: &str) -> String {
    find_prop(doc.root(), name)
        .map(node_text)
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Test end date as `YYYY-MM-DD`, read from the first `Year`/`Month`/
/// `MonthDay` props in the document. Missing any component yields the
/// sentinel — no partial dates.
pub fn end_date(doc: &Document) -> String {
    date_from(doc.root()).unwrap_or_else(|| NO_DATA.to_string())
}

/// Test start date as `YYYY-MM-DD`, scoped under the `StartDate` wrapper
/// prop.
pub fn start_date(doc: &Document) -> String {
    find_prop(doc.root(), "StartDate")
        .and_then(date_from)
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Test end time as `HH:MM:SS`, read from the first `Hours`/`Minutes`/
/// `Seconds` props in the document.
pub fn end_time(doc: &Document) -> String {
    time_from(doc.root()).unwrap_or_else(|| NO_DATA.to_string())
}

/// Test start time as `HH:MM:SS`, scoped under the `StartTime` wrapper prop.
pub fn start_time(doc: &Document) -> String {
    find_prop(doc.root(), "StartTime")
        .and_then(time_from)
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Overall UUT result: the `UUTResult` attribute of the first
/// `Report Type="UUT"` element.
pub fn uut_result(doc: &Document) -> String {
    doc.descendants()
        .find(|n| n.has_tag_name("Report") && n.attribute("Type") == Some("UUT"))
        .and_then(|n| n.attribute("UUTResult"))
        .map(str::to_string)
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Extract every nested test-primitive step record, in document order.
///
/// A match is a `Prop Name="StepName"` whose text starts with
/// `"Call Test Primitive ("`; the nested record root is found by walking to
/// the parent, into the sibling `SequenceCall` prop, its `ResultList` child
/// prop, and the first `Value` descendant under that list. Records whose
/// nested `StepName` is empty or absent are discarded. Duplicate step names
/// are NOT deduplicated — each occurrence is its own record.
pub fn call_test_primitive_steps(doc: &Document) -> Vec<StepRecord> {
    let mut steps = Vec::new();

    let calls = doc
        .descendants()
        .filter(|n| is_prop_named(n, "StepName") && node_text(*n).starts_with(CALL_PREFIX));

    for call in calls {
        let Some(parent) = call.parent_element() else {
            continue;
        };
        let Some(sequence_call) = parent.children().find(|c| is_prop_named(c, "SequenceCall"))
        else {
            continue;
        };
        let Some(result_list) = sequence_call
            .children()
            .find(|c| is_prop_named(c, "ResultList"))
        else {
            continue;
        };
        let Some(root) = result_list.descendants().find(|d| d.has_tag_name("Value")) else {
            continue;
        };

        let name = sub_prop_text(root, "StepName").unwrap_or_default();
        if name.is_empty() {
            continue;
        }

        steps.push(StepRecord {
            name,
            status: sub_prop_text(root, "Status"),
            total_time: sub_prop_f64(root, "TotalTime"),
            numeric: sub_prop_f64(root, "Numeric"),
            low: sub_prop_f64(root, "Low"),
            high: sub_prop_f64(root, "High"),
            num_loops: sub_prop_i64(root, "NumLoops"),
            num_passed: sub_prop_i64(root, "NumPassed"),
            num_failed: sub_prop_i64(root, "NumFailed"),
        });
    }

    steps
}

fn is_prop_named(node: &Node, name: &str) -> bool {
    node.has_tag_name("Prop") && node.attribute("Name").map(str::trim) == Some(name)
}

fn find_prop<'a, 'input>(scope: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    scope.descendants().find(|n| is_prop_named(n, name))
}

/// Concatenated text of every text node under `node`, trimmed.
fn node_text(node: Node) -> String {
    let mut text = String::new();
    for descendant in node.descendants().filter(Node::is_text) {
        if let Some(t) = descendant.text() {
            text.push_str(t);
        }
    }
    text.trim().to_string()
}

/// Text of the `Value` child element of a prop, trimmed.
fn value_child_text(prop: Node) -> Option<String> {
    prop.children()
        .find(|c| c.has_tag_name("Value"))
        .and_then(|v| v.text())
        .map(|t| t.trim().to_string())
}

fn date_from(scope: Node) -> Option<String> {
    let year = find_prop(scope, "Year").and_then(value_child_text)?;
    let month = find_prop(scope, "Month").and_then(value_child_text)?;
    let day = find_prop(scope, "MonthDay").and_then(value_child_text)?;
    Some(format!("{year}-{month:0>2}-{day:0>2}"))
}

fn time_from(scope: Node) -> Option<String> {
    let hours = find_prop(scope, "Hours").and_then(value_child_text)?;
    let minutes = find_prop(scope, "Minutes").and_then(value_child_text)?;
    let seconds = find_prop(scope, "Seconds").and_then(value_child_text)?;
    Some(format!("{hours:0>2}:{minutes:0>2}:{seconds:0>2}"))
}

fn sub_prop_text(scope: Node, name: &str) -> Option<String> {
    find_prop(scope, name).map(node_text)
}

fn sub_prop_f64(scope: Node, name: &str) -> Option<f64> {
    sub_prop_text(scope, name)?.parse().ok()
}

fn sub_prop_i64(scope: Node, name: &str) -> Option<i64> {
    sub_prop_text(scope, name)?.parse().ok()
}
