//! Prompt composition for the generation endpoint.

use crate::layout::ValidatedLayout;

/// Fixed instruction block prepended to every generation request.
pub const PROMPT_TEMPLATE: &str = "\
Create a top-down 2D schematic floor plan of an apartment.
Each room has known dimensions (length x width in meters) and photos.
Use the provided data to adapt furniture and layout according to photos.
Include windows, doors, and curved walls where specified.
The plan should be a clean 2D visualization with labeled rooms and furniture, schematic style.
All proportions must reflect the provided dimensions.";

/// Compose the instruction template with the layout's strict wire JSON under
/// a literal `DATA:` marker. There is no truncation: the upstream has no
/// enforced prompt-length budget here.
pub fn build_prompt(layout: &ValidatedLayout) -> serde_json::Result<String> {
    let data = layout.to_wire_json()?;
    Ok(format!("{PROMPT_TEMPLATE}\n\nDATA:\n{data}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::validate;
    use crate::plancast_test_utils;

    #[test]
    fn prompt_carries_template_and_wire_data() {
        let layout = validate(&plancast_test_utils::single_room_layout())
            .expect("fixture should validate");
        let prompt = build_prompt(&layout).expect("prompt should build");

        assert!(prompt.starts_with(PROMPT_TEMPLATE));
        let (_, data) = prompt
            .split_once("\n\nDATA:\n")
            .expect("prompt should carry the DATA marker");
        // The data section is the strict encoding: external names only.
        assert!(data.contains("\"wallId\""));
        assert!(!data.contains("\"wall_id\""));
        let parsed: serde_json::Value =
            serde_json::from_str(data).expect("data section should be valid JSON");
        assert_eq!(parsed["rooms"][0]["id"], "room-1");
    }
}
