//! Integration tests for gilt-bind.
//!
//! These tests exercise the public API from outside the crate: the binding
//! algebra, the write-once and weak utilities, and complete wizard flows
//! driven through the headless pilot.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use gilt_bind::dom::{Dom, NodeData};
use gilt_bind::event::{Key, Modifiers};
use gilt_bind::prelude::*;
use gilt_bind::reactive::{
    double_property, int_property, long_property, map_entry_property, string_property,
    BeanError, BeanProperty,
};
use gilt_bind::testing::Pilot;
use gilt_bind::util::{single_assign, weak, AssignError, SingleAssign, ThreadSafetyMode};
use gilt_bind::wizard::{KeyOutcome, NavigationError, WizardState};

// ---------------------------------------------------------------------------
// Binding algebra
// ---------------------------------------------------------------------------

#[test]
fn test_mixed_arithmetic_promotes_and_tracks() {
    let count = int_property(3);
    let total = long_property(10);
    let ratio = double_property(0.5);

    let sum = count.plus(&total);
    let scaled = sum.times(&ratio);
    assert_eq!(sum.get(), 13_i64);
    assert_eq!(scaled.get(), 6.5_f64);

    count.set(5).unwrap();
    assert_eq!(scaled.get(), 7.5);
    assert!(scaled.greater_than_value(7).get());
}

#[test]
fn test_integer_division_by_zero_yields_zero() {
    let n = int_property(7);
    let d = int_property(0);
    assert_eq!(n.divide(&d).get(), 0);
    assert_eq!(n.remainder(&d).get(), 0);
    d.set(2).unwrap();
    assert_eq!(n.divide(&d).get(), 3);
}

#[test]
fn test_string_algebra() {
    let first = string_property("Ada");
    let last = string_property("Lovelace");
    let full = first.concat_value(" ").concat(&last);
    assert_eq!(full.get(), "Ada Lovelace");

    let initial = last.char_at(0);
    let past_end = last.substring(3, 99);
    assert_eq!(initial.get(), Some('L'));
    assert_eq!(past_end.get(), None);

    last.set("Byron".into()).unwrap();
    assert_eq!(full.get(), "Ada Byron");
    assert_eq!(initial.get(), Some('B'));
    assert!(first.is_not_blank().get());
}

#[test]
fn test_boolean_algebra_reads_both_operands() {
    let agreed = Property::new(false);
    let adult = Property::new(true);
    let allowed = agreed.and(&adult);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_c = seen.clone();
    allowed.on_change(move |value| seen_c.borrow_mut().push(*value));

    agreed.set(true).unwrap();
    adult.set(false).unwrap();
    assert_eq!(*seen.borrow(), vec![true, false]);
    assert!(and_all::<Binding<bool>>(&[]).get());
}

#[test]
fn test_boolean_list_binding_follows_list_edits() {
    let flags: ObservableList<Property<bool>> = ObservableList::new();
    let all = boolean_list_binding(flags, false, |flag: &Property<bool>| *flag);
    assert!(!all.get());

    let a = Property::new(true);
    let b = Property::new(false);
    flags.push(a);
    assert!(all.get());
    flags.push(b);
    assert!(!all.get());
    b.set(true).unwrap();
    assert!(all.get());
    flags.clear();
    assert!(!all.get());
}

#[test]
fn test_bound_property_rejects_writes() {
    let source = Property::new(1);
    let mirror = Property::new(0);
    mirror.bind(&source).unwrap();
    assert_eq!(mirror.get(), 1);
    assert!(mirror.set(5).is_err());
    source.set(2).unwrap();
    assert_eq!(mirror.get(), 2);
    assert!(mirror.unbind());
    mirror.set(5).unwrap();
    assert_eq!(source.get(), 2);
}

#[test]
fn test_bean_and_map_adapters() {
    #[derive(Default)]
    struct Account {
        email: String,
    }
    let owner = Rc::new(RefCell::new(Account::default()));
    let email: BeanProperty<Account, String> = BeanProperty::builder(owner.clone())
        .name("email")
        .getter(|a: &Account| a.email.clone())
        .setter(|a: &mut Account, v| a.email = v)
        .build()
        .unwrap();
    let valid = email.observable().is_not_blank();
    email.set("ada@example.com".into()).unwrap();
    assert_eq!(owner.borrow().email, "ada@example.com");
    assert!(valid.get());

    let missing = BeanProperty::<Account, String>::builder(owner).build();
    assert!(matches!(missing, Err(BeanError::MissingAccessor)));

    let map = Rc::new(RefCell::new(HashMap::from([("lang", 1)])));
    let lang = map_entry_property(&map, "lang");
    assert_eq!(lang.get(), Some(1));
    lang.set(Some(2)).unwrap();
    assert_eq!(map.borrow().get("lang"), Some(&2));
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

#[test]
fn test_single_assign_fails_loudly() {
    let cell = single_assign::<String>(ThreadSafetyMode::Synchronized);
    assert_eq!(cell.get(), Err(AssignError::Unassigned));
    cell.set("first".into()).unwrap();
    assert_eq!(cell.set("second".into()), Err(AssignError::AlreadyAssigned));
    assert_eq!(cell.get().map(String::as_str), Ok("first"));
}

#[test]
fn test_weak_handle_runs_deinit_once() {
    let cleaned = Rc::new(Cell::new(0));
    let cleaned_c = cleaned.clone();
    let target = Rc::new(41);
    let handle = weak(&target, move || cleaned_c.set(cleaned_c.get() + 1));
    assert_eq!(handle.with_if_alive(|v| v + 1), Some(42));
    drop(target);
    assert_eq!(handle.with_if_alive(|v| v + 1), None);
    assert_eq!(handle.with_if_alive(|v| v + 1), None);
    assert_eq!(cleaned.get(), 1);
}

// ---------------------------------------------------------------------------
// Wizard flows
// ---------------------------------------------------------------------------

struct Signup {
    pilot: Pilot,
    pages: Vec<Rc<SimplePage>>,
}

fn signup(config: WizardConfig) -> Signup {
    let mut dom = Dom::new();
    let roots: Vec<_> = ["account", "profile", "confirm"]
        .iter()
        .map(|id| {
            let root = dom.insert(NodeData::new("page").with_id(*id));
            dom.insert_child(root, NodeData::new("input").focusable(true));
            root
        })
        .collect();
    let pages: Vec<Rc<SimplePage>> = ["Account", "Profile", "Confirm"]
        .iter()
        .zip(&roots)
        .map(|(title, root)| Rc::new(SimplePage::new(*title).with_root(*root)))
        .collect();
    let wizard = Wizard::builder("Sign up")
        .heading("Create your account")
        .config(config)
        .pages(pages.iter().map(|p| PageHandle::from_rc(p.clone())))
        .build();
    Signup {
        pilot: Pilot::new(wizard, dom).unwrap(),
        pages,
    }
}

#[test]
fn test_full_flow_with_buttons() {
    let Signup { mut pilot, pages } = signup(WizardConfig::default());
    let done = Rc::new(Cell::new(false));
    let done_c = done.clone();
    pilot.wizard().on_complete(move || done_c.set(true));

    assert_eq!(pilot.wizard().state(), WizardState::OnPage(0));
    assert!(pilot.wizard().heading_visible().get());
    assert_eq!(pilot.click_next(), Ok(false));

    pages[0].set_complete(true);
    assert_eq!(pilot.click_next(), Ok(true));
    pages[1].set_complete(true);
    assert_eq!(pilot.click_next(), Ok(true));
    assert!(!pilot.wizard().next_enabled().get());

    assert_eq!(pilot.click_finish(), Ok(false));
    pages[2].set_complete(true);
    assert_eq!(pilot.click_finish(), Ok(true));

    assert!(done.get());
    assert_eq!(pilot.wizard().state(), WizardState::Closed);
    assert_eq!(
        pages.iter().map(|p| p.dock_count()).collect::<Vec<_>>(),
        vec![1, 1, 1]
    );
    assert_eq!(
        pages.iter().map(|p| p.undock_count()).collect::<Vec<_>>(),
        vec![1, 1, 0]
    );
}

#[test]
fn test_keyboard_flow() {
    let Signup { mut pilot, pages } = signup(WizardConfig::new().with_enter_progresses(true));
    assert_eq!(pilot.press_key(Key::Enter), Ok(KeyOutcome::Blocked));
    for page in &pages {
        page.set_complete(true);
    }
    // Every page complete: Enter finishes from anywhere.
    assert_eq!(
        pilot.press_key_with(Key::Enter, Modifiers::NONE),
        Ok(KeyOutcome::Finished)
    );
    assert!(pilot.wizard().complete().get());
    assert_eq!(pilot.press_key(Key::Enter), Ok(KeyOutcome::Ignored));
}

#[test]
fn test_step_links() {
    let Signup { mut pilot, pages } = signup(WizardConfig::new().with_step_links(true));
    let handles = pilot.wizard().pages().get();

    assert_eq!(pilot.click_step(&handles[2]), Ok(false));
    assert_eq!(pages[0].save_count(), 1);
    pages[0].set_complete(true);
    assert_eq!(pilot.click_step(&handles[2]), Ok(true));
    assert_eq!(pilot.current_title().as_deref(), Some("Confirm"));
    assert_eq!(pilot.click_step(&handles[0]), Ok(true));

    let labels = pilot.wizard().step_labels().join(" | ");
    insta::assert_snapshot!(labels, @"1. Account | 2. Profile | 3. Confirm");
}

#[test]
fn test_navigation_errors_are_explicit() {
    let Signup { pilot, pages } = signup(WizardConfig::default());
    let wizard = pilot.wizard();
    assert_eq!(wizard.back(), Err(NavigationError::NoPreviousPage));

    let last = wizard.pages().get()[2].clone();
    wizard.jump_to(&last).unwrap();
    pages[2].set_complete(true);
    assert_eq!(
        wizard.next(),
        Err(NavigationError::OutOfBounds { index: 3, len: 3 })
    );

    let stranger = PageHandle::new(SimplePage::new("Elsewhere"));
    assert_eq!(wizard.jump_to(&stranger), Err(NavigationError::UnknownPage));
    wizard.cancel().unwrap();
    assert_eq!(wizard.next(), Err(NavigationError::Closed));
}
