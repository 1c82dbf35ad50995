use order_bot::dialogue::{advance, DialogueEvent, DialogueReply, Next, OrderDialogueState};
use order_bot::validation::{parse_items, MAX_ITEMS};

fn receive_items(name: &str) -> OrderDialogueState {
    OrderDialogueState::ReceiveItems {
        name: name.to_string(),
    }
}

fn confirm_order(name: &str, items: &[&str]) -> OrderDialogueState {
    OrderDialogueState::ConfirmOrder {
        name: name.to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
        review_message_id: None,
    }
}

/// Walk the happy path from /start to a submitted order
#[test]
fn test_full_order_flow() {
    let step = advance(
        &OrderDialogueState::Idle,
        DialogueEvent::Start { display_name: "Anna" },
    );
    let Next::Move(state) = step.next else {
        panic!("Start should move to name collection");
    };
    assert_eq!(state, OrderDialogueState::ReceiveName);

    let step = advance(&state, DialogueEvent::Text("Anna Ivanova"));
    assert_eq!(
        step.reply,
        DialogueReply::AskItems {
            name: "Anna Ivanova".to_string()
        }
    );
    let Next::Move(state) = step.next else {
        panic!("Valid name should move to item collection");
    };
    assert_eq!(state, receive_items("Anna Ivanova"));

    let step = advance(&state, DialogueEvent::Text("Milk, , Bread"));
    assert_eq!(
        step.reply,
        DialogueReply::Review {
            name: "Anna Ivanova".to_string(),
            items: vec!["Milk".to_string(), "Bread".to_string()],
        }
    );
    let Next::Move(state) = step.next else {
        panic!("Valid items should move to confirmation");
    };
    assert_eq!(state, confirm_order("Anna Ivanova", &["Milk", "Bread"]));

    let step = advance(&state, DialogueEvent::Confirm { message_id: Some(1) });
    assert_eq!(step.reply, DialogueReply::OrderSaved);
    assert_eq!(
        step.next,
        Next::Submit {
            name: "Anna Ivanova".to_string(),
            items: vec!["Milk".to_string(), "Bread".to_string()],
        }
    );
}

/// Names matching the pattern advance, everything else re-prompts in place
#[test]
fn test_name_acceptance() {
    let accepted = ["Anna Ivanova", "Анна", "Jean-Luc Picard", "ab", "Ёжик"];
    for name in accepted {
        let step = advance(&OrderDialogueState::ReceiveName, DialogueEvent::Text(name));
        assert!(
            matches!(step.next, Next::Move(OrderDialogueState::ReceiveItems { .. })),
            "{name} should be accepted"
        );
    }

    let long_name = "a".repeat(51);
    let rejected = ["a", "Anna1", "anna@example.com", "   ", long_name.as_str()];
    for name in rejected {
        let step = advance(&OrderDialogueState::ReceiveName, DialogueEvent::Text(name));
        assert_eq!(step.reply, DialogueReply::InvalidName, "{name} should be rejected");
        assert_eq!(step.next, Next::Stay);
    }
}

/// Name retries are unbounded
#[test]
fn test_name_retries_are_unbounded() {
    let state = OrderDialogueState::ReceiveName;
    for _ in 0..100 {
        let step = advance(&state, DialogueEvent::Text("1"));
        assert_eq!(step.next, Next::Stay);
    }
    let step = advance(&state, DialogueEvent::Text("Anna"));
    assert!(matches!(step.next, Next::Move(_)));
}

/// Item length boundaries: 1 and 51 rejected, 2 and 50 accepted
#[test]
fn test_item_length_boundaries() {
    let state = receive_items("Anna");

    for len in [2, 50] {
        let step = advance(&state, DialogueEvent::Text(&"x".repeat(len)));
        assert!(
            matches!(step.next, Next::Move(OrderDialogueState::ConfirmOrder { .. })),
            "length {len} should be accepted"
        );
    }

    for len in [1, 51] {
        let step = advance(&state, DialogueEvent::Text(&"x".repeat(len)));
        assert!(
            matches!(step.reply, DialogueReply::InvalidItem { .. }),
            "length {len} should be rejected"
        );
        assert_eq!(step.next, Next::Stay);
    }
}

/// "Milk, , Bread,XY": XY has exactly two characters and is kept
#[test]
fn test_two_character_item_is_kept() {
    let step = advance(&receive_items("Anna"), DialogueEvent::Text("Milk, , Bread,XY"));
    assert_eq!(
        step.next,
        Next::Move(confirm_order("Anna", &["Milk", "Bread", "XY"]))
    );
}

/// Re-splitting the joined, cleaned list yields the same items
#[test]
fn test_item_cleaning_is_idempotent() {
    let inputs = [
        "Milk, , Bread",
        "  eggs ,flour,, sugar  ",
        "Молоко, Хлеб, Яблоки",
        "a b c, d-e-f",
    ];

    for input in inputs {
        let items = parse_items(input).unwrap();
        let again = parse_items(&items.join(",")).unwrap();
        assert_eq!(items, again);
        let again = parse_items(&items.join(", ")).unwrap();
        assert_eq!(items, again);
    }
}

/// Editing keeps the name and drops the previous items
#[test]
fn test_edit_clears_items_keeps_name() {
    let state = confirm_order("Anna", &["Milk", "Bread"]);
    let step = advance(&state, DialogueEvent::Edit { message_id: Some(1) });
    assert_eq!(step.reply, DialogueReply::EditItems);
    assert_eq!(step.next, Next::Move(receive_items("Anna")));

    // The new list replaces the old one, nothing is merged
    let step = advance(&receive_items("Anna"), DialogueEvent::Text("Cheese"));
    assert_eq!(step.next, Next::Move(confirm_order("Anna", &["Cheese"])));
}

/// Cancelling ends every active dialogue without submitting anything
#[test]
fn test_cancel_from_any_active_state() {
    let states = [
        OrderDialogueState::ReceiveName,
        receive_items("Anna"),
        confirm_order("Anna", &["Milk"]),
    ];

    for state in states {
        let step = advance(&state, DialogueEvent::Cancel);
        assert_eq!(step.reply, DialogueReply::Cancelled);
        assert_eq!(step.next, Next::Exit);
    }
}

/// Free text without an order in progress points the user to /start
#[test]
fn test_text_without_session() {
    let step = advance(&OrderDialogueState::Idle, DialogueEvent::Text("hello"));
    assert_eq!(step.reply, DialogueReply::NoActiveOrder);
    assert_eq!(step.next, Next::Stay);
}

/// Every accepted item list yields a review; longer lists are refused
#[test]
fn test_item_count_cap() {
    let state = receive_items("Anna");

    let at_cap = vec!["ab"; MAX_ITEMS].join(", ");
    let step = advance(&state, DialogueEvent::Text(&at_cap));
    assert!(matches!(step.reply, DialogueReply::Review { .. }));

    let over_cap = vec!["ab"; MAX_ITEMS + 1].join(", ");
    let step = advance(&state, DialogueEvent::Text(&over_cap));
    assert_eq!(step.reply, DialogueReply::TooManyItems);
    assert_eq!(step.next, Next::Stay);
}

/// States saved before review ids were tracked still load
#[test]
fn test_confirm_state_without_review_id_deserializes() {
    let json = r#"{"ConfirmOrder":{"name":"Anna","items":["Milk"]}}"#;
    let state: OrderDialogueState = serde_json::from_str(json).unwrap();
    assert_eq!(state, confirm_order("Anna", &["Milk"]));
}

/// Dialogue states can be serialized for persistent dialogue storages
#[test]
fn test_dialogue_state_serialization() {
    let state = confirm_order("Anna", &["Milk"]);
    let json = serde_json::to_string(&state).unwrap();
    let restored: OrderDialogueState = serde_json::from_str(&json).unwrap();
    assert_eq!(state, restored);
}
