//! String observables.
//!
//! Positions count characters, not bytes. Positional lookups outside the
//! string yield `None` instead of failing.

use regex::Regex;

use super::binding::Binding;
use super::property::Observable;

fn char_at(text: &str, index: usize) -> Option<char> {
    text.chars().nth(index)
}

fn substring(text: &str, start: usize, end: usize) -> Option<String> {
    if start > end || end > text.chars().count() {
        return None;
    }
    Some(text.chars().skip(start).take(end - start).collect())
}

fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// String operations on `String` observables.
pub trait StringExpr: Observable<String> {
    fn concat<O: Observable<String>>(&self, other: &O) -> Binding<String> {
        let (this, other) = (*self, *other);
        Binding::new(&[this.id(), other.id()], move || {
            let mut joined = this.get();
            joined.push_str(&other.get());
            joined
        })
    }

    fn concat_value(&self, suffix: impl Into<String>) -> Binding<String> {
        let suffix = suffix.into();
        self.map(move |text| format!("{text}{suffix}"))
    }

    /// Length in characters.
    fn length(&self) -> Binding<usize> {
        self.map(|text| text.chars().count())
    }

    fn char_at(&self, index: usize) -> Binding<Option<char>> {
        self.map(move |text| char_at(text, index))
    }

    /// Character at an observable index. Negative indices yield `None`.
    fn char_at_observable<O: Observable<i32>>(&self, index: &O) -> Binding<Option<char>> {
        let (this, index) = (*self, *index);
        Binding::new(&[this.id(), index.id()], move || {
            let index = usize::try_from(index.get()).ok()?;
            char_at(&this.get(), index)
        })
    }

    /// Characters `start..end`. `None` unless `start <= end <= length`.
    fn substring(&self, start: usize, end: usize) -> Binding<Option<String>> {
        self.map(move |text| substring(text, start, end))
    }

    /// Characters from `start` to the end.
    fn substring_from(&self, start: usize) -> Binding<Option<String>> {
        self.map(move |text| substring(text, start, text.chars().count()))
    }

    fn substring_observable<S, E>(&self, start: &S, end: &E) -> Binding<Option<String>>
    where
        S: Observable<i32>,
        E: Observable<i32>,
    {
        let (this, start, end) = (*self, *start, *end);
        Binding::new(&[this.id(), start.id(), end.id()], move || {
            let start = usize::try_from(start.get()).ok()?;
            let end = usize::try_from(end.get()).ok()?;
            substring(&this.get(), start, end)
        })
    }

    fn reversed(&self) -> Binding<String> {
        self.map(|text| text.chars().rev().collect())
    }

    /// `true` when empty or whitespace only.
    fn is_blank(&self) -> Binding<bool> {
        self.map(|text| is_blank(text))
    }

    fn is_not_blank(&self) -> Binding<bool> {
        self.map(|text| !is_blank(text))
    }

    /// `true` when `pattern` matches the whole string.
    fn matches(&self, pattern: Regex) -> Binding<bool> {
        let pattern = Regex::new(&format!(r"\A(?:{})\z", pattern.as_str())).unwrap_or(pattern);
        self.map(move |text| {
            pattern
                .find(text)
                .is_some_and(|found| found.start() == 0 && found.end() == text.len())
        })
    }

    fn sorts_after<O: Observable<String>>(&self, other: &O) -> Binding<bool> {
        let (this, other) = (*self, *other);
        Binding::new(&[this.id(), other.id()], move || this.get() > other.get())
    }

    fn sorts_after_or_equal<O: Observable<String>>(&self, other: &O) -> Binding<bool> {
        let (this, other) = (*self, *other);
        Binding::new(&[this.id(), other.id()], move || this.get() >= other.get())
    }

    fn sorts_before<O: Observable<String>>(&self, other: &O) -> Binding<bool> {
        let (this, other) = (*self, *other);
        Binding::new(&[this.id(), other.id()], move || this.get() < other.get())
    }

    fn sorts_before_or_equal<O: Observable<String>>(&self, other: &O) -> Binding<bool> {
        let (this, other) = (*self, *other);
        Binding::new(&[this.id(), other.id()], move || this.get() <= other.get())
    }

    fn sorts_after_value(&self, other: impl Into<String>) -> Binding<bool> {
        let other = other.into();
        self.map(move |text| *text > other)
    }

    fn sorts_after_or_equal_value(&self, other: impl Into<String>) -> Binding<bool> {
        let other = other.into();
        self.map(move |text| *text >= other)
    }

    fn sorts_before_value(&self, other: impl Into<String>) -> Binding<bool> {
        let other = other.into();
        self.map(move |text| *text < other)
    }

    fn sorts_before_or_equal_value(&self, other: impl Into<String>) -> Binding<bool> {
        let other = other.into();
        self.map(move |text| *text <= other)
    }

    /// Unicode-aware case-insensitive equality.
    fn equals_ignore_case<O: Observable<String>>(&self, other: &O) -> Binding<bool> {
        let (this, other) = (*self, *other);
        Binding::new(&[this.id(), other.id()], move || {
            this.get().to_lowercase() == other.get().to_lowercase()
        })
    }

    fn equals_ignore_case_value(&self, other: impl Into<String>) -> Binding<bool> {
        let other = other.into().to_lowercase();
        self.map(move |text| text.to_lowercase() == other)
    }
}

impl<O: Observable<String>> StringExpr for O {}
