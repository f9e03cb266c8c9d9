use pretty_assertions::assert_eq;

use mxchat::diagram::Diagram;
use mxchat::intent::{self, Intent};
use mxchat::{EditOptions, ReplaceScope};

const GPU_CPU: &str = r##"<mxfile host="app.diagrams.net">
  <diagram id="page-1" name="Page-1">
    <mxGraphModel dx="1200" dy="800" grid="1">
      <root>
        <mxCell id="0"/>
        <mxCell id="1" parent="0"/>
        <mxCell id="2" value="GPU" style="rounded=1;whiteSpace=wrap;fillColor=#ffffff;" vertex="1" parent="1">
          <mxGeometry x="40" y="40" width="120" height="60" as="geometry"/>
        </mxCell>
        <mxCell id="3" value="CPU" style="rounded=1;whiteSpace=wrap;" vertex="1" parent="1">
          <mxGeometry x="240" y="40" width="120" height="60" as="geometry"/>
        </mxCell>
        <mxCell id="4" style="endArrow=classic;" edge="1" parent="1" source="2" target="3">
          <mxGeometry relative="1" as="geometry"/>
        </mxCell>
      </root>
    </mxGraphModel>
  </diagram>
</mxfile>"##;

fn diagram(markup: &str) -> Diagram {
    Diagram::parse(markup).unwrap()
}

fn labels(markup: &str) -> Vec<String> {
    diagram(markup)
        .nodes()
        .filter_map(|node| node.label.clone())
        .collect()
}

// ===== End-to-end scenarios =====

#[test]
fn spec_remove_block_drops_node_and_its_edges() {
    let outcome = mxchat::edit(GPU_CPU, "remove GPU block");
    assert_eq!(
        outcome.intent,
        Intent::Remove {
            component: "GPU".to_string()
        }
    );
    assert_eq!(labels(&outcome.markup), vec!["CPU"]);
    assert_eq!(diagram(&outcome.markup).edges().count(), 0);
    assert_eq!(
        outcome.changes,
        vec![
            "Removed component \"GPU\"",
            "Removed 1 connection(s) attached to \"GPU\"",
        ]
    );
}

#[test]
fn spec_change_label_replaces_whole_words() {
    let outcome = mxchat::edit(GPU_CPU, "change GPU to CPU");
    assert_eq!(labels(&outcome.markup), vec!["CPU", "CPU"]);
    assert_eq!(outcome.changes, vec!["Replaced 1 occurrence(s) of \"GPU\" with \"CPU\""]);
}

#[test]
fn spec_empty_document_is_left_alone() {
    let outcome = mxchat::edit("", "add a RAM component");
    assert_eq!(outcome.markup, "");
    assert!(outcome.changes.is_empty());

    let rootless = "<mxGraphModel></mxGraphModel>";
    let outcome = mxchat::edit(rootless, "add a RAM component");
    assert_eq!(outcome.markup, rootless);
    assert!(outcome.changes.is_empty());
}

#[test]
fn spec_make_bigger_resizes_named_component() {
    let outcome = mxchat::edit(GPU_CPU, "make CPU bigger");
    assert_eq!(outcome.intent, Intent::ContextualBulkResize);
    assert_eq!(outcome.changes, vec!["Resized \"CPU\" to 150×150"]);
    assert!(outcome
        .markup
        .contains("<mxGeometry x=\"240\" y=\"40\" width=\"150\" height=\"150\" as=\"geometry\"/>"));
    assert!(outcome
        .markup
        .contains("<mxGeometry x=\"40\" y=\"40\" width=\"120\" height=\"60\" as=\"geometry\"/>"));
}

// ===== Remove =====

const WRAPPED: &str = r##"<mxGraphModel>
  <root>
    <mxCell id="0"/>
    <mxCell id="1" parent="0"/>
    <object label="GPU" tooltip="graphics" id="2">
      <mxCell style="rounded=1;" vertex="1" parent="1">
        <mxGeometry x="40" y="40" width="120" height="60" as="geometry"/>
      </mxCell>
    </object>
    <mxCell id="3" value="CPU" vertex="1" parent="1">
      <mxGeometry x="240" y="40" width="120" height="60" as="geometry"/>
    </mxCell>
    <mxCell id="4" edge="1" parent="1" source="2" target="3"/>
  </root>
</mxGraphModel>"##;

#[test]
fn spec_wrapped_components_are_editable() {
    assert_eq!(mxchat::engine::component_labels(WRAPPED), vec!["GPU", "CPU"]);

    let outcome = mxchat::edit(WRAPPED, "remove GPU block");
    assert_eq!(
        outcome.changes,
        vec![
            "Removed component \"GPU\"",
            "Removed 1 connection(s) attached to \"GPU\"",
        ]
    );
    assert!(!outcome.markup.contains("<object"));

    let outcome = mxchat::edit(WRAPPED, "make GPU bigger");
    assert_eq!(outcome.changes, vec!["Resized \"GPU\" to 150×150"]);
    assert!(outcome.markup.contains("<object label=\"GPU\" tooltip=\"graphics\" id=\"2\">"));
    assert!(outcome
        .markup
        .contains("<mxGeometry x=\"40\" y=\"40\" width=\"150\" height=\"150\" as=\"geometry\"/>"));
}

#[test]
fn spec_byte_order_mark_upload_is_editable() {
    let markup = format!("\u{feff}{GPU_CPU}");
    let outcome = mxchat::edit(&markup, "add a RAM component");
    assert_eq!(outcome.changes, vec!["Added component \"RAM\" (id 5)"]);
}

#[test]
fn spec_remove_unknown_component_changes_nothing() {
    let outcome = mxchat::edit(GPU_CPU, "delete the TPU");
    assert!(!outcome.applied());
    assert_eq!(outcome.markup, GPU_CPU);
}

#[test]
fn spec_remove_matches_label_substring() {
    let outcome = mxchat::edit(GPU_CPU, "please remove PU");
    assert_eq!(labels(&outcome.markup), Vec::<String>::new());
    assert_eq!(diagram(&outcome.markup).edges().count(), 0);
}

// ===== Replace =====

#[test]
fn spec_replace_counts_every_whole_word_hit() {
    let markup = GPU_CPU.replace("value=\"CPU\"", "value=\"gpu host\"");
    let outcome = mxchat::edit(&markup, "rename GPU to tpu");
    assert_eq!(outcome.changes, vec!["Replaced 2 occurrence(s) of \"GPU\" with \"TPU\""]);
    assert_eq!(labels(&outcome.markup), vec!["TPU", "TPU host"]);
    assert!(!outcome.markup.to_lowercase().contains("gpu"));
}

#[test]
fn spec_replace_scope_everywhere_touches_styles() {
    let options = EditOptions {
        replace_scope: ReplaceScope::Everywhere,
    };
    let outcome = mxchat::edit_with_options(GPU_CPU, "replace wrap with clip", &options);
    assert_eq!(outcome.changes, vec!["Replaced 2 occurrence(s) of \"wrap\" with \"CLIP\""]);
    assert!(outcome.markup.contains("whiteSpace=CLIP;"));
    assert!(mxchat::edit(GPU_CPU, "replace wrap with clip").changes.is_empty());

    let outcome = mxchat::edit_with_options(GPU_CPU, "replace classic with block", &options);
    assert!(outcome.markup.contains("endArrow=BLOCK;"));
}

// ===== Disconnect =====

#[test]
fn spec_disconnect_between_named_components() {
    let outcome = mxchat::edit(GPU_CPU, "remove the connection between GPU and CPU");
    assert_eq!(
        outcome.intent,
        Intent::DisconnectEdges {
            first: Some("GPU".to_string()),
            second: Some("CPU".to_string())
        }
    );
    assert_eq!(diagram(&outcome.markup).edges().count(), 0);
    assert_eq!(labels(&outcome.markup), vec!["GPU", "CPU"]);
}

#[test]
fn spec_disconnect_all_twice_reports_nothing_second_time() {
    let first = mxchat::edit(GPU_CPU, "delete all arrows");
    assert_eq!(first.changes, vec!["Removed all 1 connection(s)"]);

    let second = mxchat::edit(&first.markup, "delete all arrows");
    assert!(second.changes.is_empty());
    assert_eq!(second.markup, first.markup);
}

// ===== Add =====

#[test]
fn spec_add_uses_next_numeric_id() {
    let before = diagram(GPU_CPU).next_id().unwrap();
    let outcome = mxchat::edit(GPU_CPU, "add a ram component");
    let after = diagram(&outcome.markup);
    assert_eq!(after.next_id(), Some(before + 1));
    assert_eq!(labels(&outcome.markup), vec!["GPU", "CPU", "RAM"]);
    assert_eq!(outcome.changes, vec!["Added component \"RAM\" (id 5)"]);
    assert!(outcome.markup.contains(
        "<mxCell id=\"5\" value=\"RAM\" style=\"rounded=1;whiteSpace=wrap;html=1;fillColor=#dae8fc;strokeColor=#6c8ebf;\" vertex=\"1\" parent=\"1\">"
    ));
}

#[test]
fn spec_add_fails_when_ids_are_exhausted() {
    let markup = GPU_CPU.replace("id=\"4\"", "id=\"18446744073709551615\"");
    let outcome = mxchat::edit(&markup, "add a RAM component");
    assert!(outcome.changes.is_empty());
    assert_eq!(outcome.markup, markup);
}

#[test]
fn spec_add_keeps_wrapper_markup() {
    let outcome = mxchat::edit(GPU_CPU, "add a RAM component");
    assert!(outcome.markup.starts_with("<mxfile host=\"app.diagrams.net\">"));
    assert!(outcome
        .markup
        .contains("<mxGraphModel dx=\"1200\" dy=\"800\" grid=\"1\">"));
}

// ===== Modify property =====

#[test]
fn spec_color_words_map_to_fixed_codes() {
    for (word, code) in [
        ("red", "#f8cecc"),
        ("blue", "#dae8fc"),
        ("green", "#d5e8d4"),
        ("yellow", "#fff2cc"),
        ("orange", "#ffe6cc"),
        ("purple", "#e1d5e7"),
        ("pink", "#ffd1dc"),
        ("gray", "#f5f5f5"),
    ] {
        let outcome = mxchat::edit(GPU_CPU, &format!("change GPU color to {word}"));
        let gpu = diagram(&outcome.markup);
        assert_eq!(gpu.node("2").unwrap().style.get("fillColor"), Some(code), "{word}");
    }
}

#[test]
fn spec_unknown_color_written_verbatim() {
    let outcome = mxchat::edit(GPU_CPU, "set CPU colour to teal");
    let cpu = diagram(&outcome.markup);
    assert_eq!(cpu.node("3").unwrap().style.get("fillColor"), Some("teal"));
    assert_eq!(outcome.changes, vec!["Changed fill color of \"CPU\" to teal"]);
}

#[test]
fn spec_size_is_applied_to_width_and_height() {
    let outcome = mxchat::edit(GPU_CPU, "set GPU size to 200");
    let geometry = diagram(&outcome.markup).node("2").unwrap().geometry.clone().unwrap();
    assert_eq!((geometry.width, geometry.height), (Some(200.0), Some(200.0)));
}

// ===== Priority =====

#[test]
fn spec_intent_priority_order() {
    assert_eq!(intent::classify("remove all arrows").kind(), intent::IntentKind::Remove);
    let kinds: Vec<_> = intent::candidates("remove all arrows")
        .iter()
        .map(Intent::kind)
        .collect();
    assert_eq!(
        kinds,
        vec![intent::IntentKind::Remove, intent::IntentKind::DisconnectEdges]
    );
}

#[test]
fn spec_only_one_transform_per_instruction() {
    // "change ... to ..." also reads as a rename; the recolor only runs when
    // the rename finds nothing.
    let outcome = mxchat::edit(GPU_CPU, "change GPU color to red");
    assert_eq!(outcome.changes.len(), 1);
    assert_eq!(labels(&outcome.markup), vec!["GPU", "CPU"]);
}

#[test]
fn spec_unrecognized_instruction_returns_input() {
    let outcome = mxchat::edit(GPU_CPU, "what a lovely diagram");
    assert_eq!(outcome.intent, Intent::Unrecognized);
    assert_eq!(outcome.markup, GPU_CPU);
}
