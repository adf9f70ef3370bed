//! End-to-end scenarios: a page with a hydrated counter, a ticking timer and
//! an editable list, all rendered under one provider.

use atomslice::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn page_state() -> SliceState<Value> {
    [
        ("count".to_owned(), Value::Int(0)),
        ("key".to_owned(), Value::Int(123)),
        ("time".to_owned(), Value::Int(0)),
    ]
    .into_iter()
    .collect()
}

fn list_state() -> Vec<Value> {
    vec![
        Value::Int(1),
        Value::Int(2),
        Value::Int(3),
        Value::Int(4),
        Value::Int(5),
        Value::from("haha"),
    ]
}

struct Page {
    test: SliceStore<Value>,
    vec: VecStore<Value>,
    counter: Component,
    timer: Component,
    list: Component,
    items: Vec<Component>,
}

impl Page {
    fn mount() -> Self {
        let store = Store::with_label("page");
        let test = create_slice_store(&page_state(), StoreOptions::new().name("test").store(store.clone()));
        let vec = create_vec_store(&list_state(), StoreOptions::new().name("vec").store(store));
        Self {
            test,
            vec,
            counter: Component::new("Counter"),
            timer: Component::new("Timer"),
            list: Component::new("VecNode"),
            items: Vec::new(),
        }
    }

    fn render_counter(&self) -> Option<Value> {
        let test = &self.test;
        test.provider().render(|| {
            self.counter.render(|cx| {
                let seed: SliceState<Value> = [("count".to_owned(), Value::Int(100))].into_iter().collect();
                test.use_hydrate(cx, seed);
                test.use_get_state_by_key(cx, "count")
            })
        })
    }

    fn render_timer(&self) -> Option<Value> {
        let test = &self.test;
        test.provider()
            .render(|| self.timer.render(|cx| test.use_get_state_by_key(cx, "time")))
    }

    fn render_list(&mut self) -> Vec<Option<Value>> {
        let vec = self.vec.clone();
        let len = vec
            .provider()
            .render(|| self.list.render(|cx| vec.use_get_state(cx).len()));
        while self.items.len() < len {
            self.items.push(Component::new(format!("VecItem-{}", self.items.len())));
        }
        self.items
            .iter()
            .enumerate()
            .map(|(i, c)| vec.provider().render(|| c.render(|cx| vec.use_get_item(cx, i))))
            .collect()
    }

    /// Mounted components waiting for a re-render.
    fn dirty(&self) -> Vec<&str> {
        [&self.counter, &self.timer, &self.list]
            .into_iter()
            .chain(self.items.iter())
            .filter(|c| c.render_count() > 0 && c.needs_render())
            .map(Component::name)
            .collect()
    }
}

#[test]
fn counter_hydrates_once_and_increments() {
    init_tracing();
    let page = Page::mount();

    assert_eq!(page.render_counter(), Some(Value::Int(100)));
    page.render_timer();

    let count = page.test.get_state_by_key("count").and_then(|v| v.as_i64()).unwrap_or(0);
    page.test.set_state_by_key("count", Value::Int(count + 1));

    assert_eq!(page.dirty(), vec!["Counter"]);
    assert_eq!(page.render_counter(), Some(Value::Int(101)));
}

#[test]
fn timer_ticks_do_not_rerender_counter() {
    init_tracing();
    let page = Page::mount();
    page.render_counter();
    page.render_timer();

    for _ in 0..3 {
        let time = page.test.get_state_by_key("time").and_then(|v| v.as_i64()).unwrap_or(0);
        page.test.set_state_by_key("time", Value::Int(time + 1));
        assert_eq!(page.dirty(), vec!["Timer"]);
        page.render_timer();
    }

    assert_eq!(page.test.get_state_by_key("time"), Some(Value::Int(3)));
    assert_eq!(page.counter.render_count(), 1);
    assert_eq!(page.timer.subscribe_count(), 1);
}

#[test]
fn editing_one_item_rerenders_that_item_and_the_list() {
    init_tracing();
    let mut page = Page::mount();
    let items = page.render_list();
    assert_eq!(items.len(), 6);
    assert_eq!(items[5], Some(Value::from("haha")));

    page.vec.set_item(2, Value::from("edited"));
    assert_eq!(page.dirty(), vec!["VecNode", "VecItem-2"]);

    let items = page.render_list();
    assert_eq!(items[2], Some(Value::from("edited")));
    assert_eq!(page.items[0].render_count(), 2);
    assert!(page.dirty().is_empty());
}

#[test]
fn page_reset_restores_everything() {
    init_tracing();
    let page = Page::mount();
    page.render_counter();
    page.test.set_state_by_key("key", Value::Int(0));
    page.vec.set_state(Vec::new());

    page.test.reset_state(Some(&["key"][..]));
    assert_eq!(page.test.get_state_by_key("key"), Some(Value::Int(123)));
    assert_eq!(page.test.get_state_by_key("count"), Some(Value::Int(100)));

    page.test.reset_state(None);
    assert_eq!(page.test.get_state(None), page_state());

    page.vec.reset_state();
    assert_eq!(page.vec.get_state(), list_state());
}

#[test]
fn nested_providers_resolve_innermost_store() {
    init_tracing();
    let outer = Store::new();
    let inner = Store::new();
    let counter = create_slice_store(&page_state(), StoreOptions::new().name("test").store(outer.clone()));
    inner.set(&counter.key_atom("count"), Value::Int(9));

    let c = Component::new("nested");
    let seen = create_provider(&outer).render(|| {
        create_provider(&inner).render(|| c.render(|cx| counter.use_get_state_by_key(cx, "count")))
    });
    assert_eq!(seen, Some(Value::Int(9)));
    assert_eq!(counter.get_state_by_key("count"), Some(Value::Int(0)));
}

#[test]
fn default_store_is_shared_within_a_thread() {
    init_tracing();
    let a = create_slice_store(&page_state(), StoreOptions::new().name("a"));
    let b = create_slice_store(&page_state(), StoreOptions::new().name("b"));
    assert_eq!(a.store(), b.store());
    assert_eq!(a.store(), &default_store());

    a.set_state_by_key("count", Value::Int(1));
    assert_eq!(b.get_state_by_key("count"), Some(Value::Int(0)));
}
