//! Keyboard focus helpers for the activity header placement menu.

use wasm_bindgen::JsCast;

fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|window| window.document())
}

/// Focuses an element by id; returns whether a focusable element was found.
pub(super) fn focus_element_by_id(id: &str) -> bool {
    let Some(element) = document()
        .and_then(|document| document.get_element_by_id(id))
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return false;
    };
    let _ = element.focus();
    true
}

fn enabled_menu_items(menu_id: &str) -> Vec<web_sys::HtmlElement> {
    let Some(menu) = document().and_then(|document| document.get_element_by_id(menu_id)) else {
        return Vec::new();
    };
    let Ok(nodes) = menu.query_selector_all(r#"[role="menuitem"]:not([disabled])"#) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .collect()
}

pub(super) fn focus_first_menu_item(menu_id: &str) -> bool {
    match enabled_menu_items(menu_id).first() {
        Some(first) => {
            let _ = first.focus();
            true
        }
        None => false,
    }
}

/// Index reached by moving `delta` items from `current`, wrapping at both ends.
fn wrapped_index(current: Option<usize>, delta: i32, len: usize) -> usize {
    let len = len as i32;
    let start = current.map(|index| index as i32).unwrap_or(if delta < 0 { 0 } else { -1 });
    (start + delta).rem_euclid(len) as usize
}

fn focus_menu_item(menu_id: &str, pick: impl FnOnce(Option<usize>, usize) -> usize) -> bool {
    let items = enabled_menu_items(menu_id);
    if items.is_empty() {
        return false;
    }
    let active = document().and_then(|document| document.active_element());
    let current = active.and_then(|active| {
        items
            .iter()
            .position(|item| item.is_same_node(Some(AsRef::<web_sys::Node>::as_ref(&active))))
    });
    let _ = items[pick(current, items.len())].focus();
    true
}

/// Arrow/Home/End navigation between menu items; prevents default when handled.
pub(super) fn handle_menu_roving_keydown(ev: &web_sys::KeyboardEvent, menu_id: &str) -> bool {
    let handled = match ev.key().as_str() {
        "ArrowDown" => focus_menu_item(menu_id, |current, len| wrapped_index(current, 1, len)),
        "ArrowUp" => focus_menu_item(menu_id, |current, len| wrapped_index(current, -1, len)),
        "Home" => focus_menu_item(menu_id, |_, _| 0),
        "End" => focus_menu_item(menu_id, |_, len| len - 1),
        _ => false,
    };

    if handled {
        ev.prevent_default();
        ev.stop_propagation();
    }
    handled
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn roving_index_wraps_both_ways() {
        assert_eq!(wrapped_index(Some(4), 1, 5), 0);
        assert_eq!(wrapped_index(Some(0), -1, 5), 4);
        assert_eq!(wrapped_index(Some(2), 1, 5), 3);
    }

    #[test]
    fn roving_without_focus_starts_at_an_edge() {
        assert_eq!(wrapped_index(None, 1, 6), 0);
        assert_eq!(wrapped_index(None, -1, 6), 5);
    }
}
