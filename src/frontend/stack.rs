use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};
use yew::prelude::*;

use super::dom::{document_offset, scroll_y, set_timeout_detached, viewport_size, AnimationLoop, Listener};
use crate::scroll_stack::{LayoutProbe, ScrollStack, SmoothedScroll, StackConfig};

const CARD_SELECTOR: &str = ".scroll-stack-card";
const END_SELECTOR: &str = ".scroll-stack-end";

/// Measures the stack's cards through the live DOM.
struct DomLayout {
    cards: Vec<HtmlElement>,
    end: HtmlElement,
}

impl DomLayout {
    fn query(root: &Element) -> Option<Self> {
        let nodes = root.query_selector_all(CARD_SELECTOR).ok()?;
        let cards = (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect();
        let end = root
            .query_selector(END_SELECTOR)
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()?;

        Some(Self { cards, end })
    }

    fn paint(&self, index: usize, transform: &str, filter: &str) {
        if let Some(card) = self.cards.get(index) {
            let style = card.style();
            let _ = style.set_property("transform", transform);
            let _ = style.set_property("filter", filter);
        }
    }
}

impl LayoutProbe for DomLayout {
    fn viewport_height(&self) -> f64 {
        viewport_size().1
    }

    fn card_offsets(&self) -> Vec<f64> {
        self.cards.iter().map(document_offset).collect()
    }

    fn end_offset(&self) -> f64 {
        document_offset(&self.end)
    }
}

#[derive(Properties, PartialEq)]
pub struct ScrollStackProps {
    #[prop_or_default]
    pub children: Children,
    #[prop_or_default]
    pub config: StackConfig,
    #[prop_or_default]
    pub class: Classes,
    /// Fired each time the last card becomes fully stacked.
    #[prop_or_default]
    pub on_stack_complete: Callback<()>,
}

#[function_component(ScrollStackView)]
pub fn scroll_stack_view(props: &ScrollStackProps) -> Html {
    let root = use_node_ref();
    let count = props.children.len();

    {
        let root = root.clone();
        let on_complete = props.on_stack_complete.clone();
        use_effect_with((props.config.clone(), count), move |(config, _)| {
            let running = root
                .cast::<Element>()
                .and_then(DomLayout::query)
                .and_then(|layout| start_stack(layout, config.clone(), on_complete));

            move || drop(running)
        });
    }

    let margin = ScrollStack::new(props.config.clone()).ok();

    html! {
        <div class={classes!("scroll-stack", props.class.clone())} ref={root}>
            <div class="scroll-stack-inner">
                { for props.children.iter().enumerate().map(|(index, child)| {
                    let gap = margin
                        .as_ref()
                        .and_then(|stack| stack.card_margin(index, count))
                        .unwrap_or(0.0);
                    html! {
                        <div
                            class="scroll-stack-card"
                            style={format!("margin-bottom: {gap}px; transform-origin: top center; will-change: transform, filter;")}
                        >
                            {child}
                        </div>
                    }
                }) }
                <div class="scroll-stack-end" style="width: 100%; height: 50vh;" aria-hidden="true"></div>
            </div>
        </div>
    }
}

struct RunningStack {
    engine: Rc<RefCell<ScrollStack>>,
    _frames: AnimationLoop,
    _resize: Option<Listener>,
}

impl Drop for RunningStack {
    fn drop(&mut self) {
        self.engine.borrow_mut().teardown();
    }
}

fn start_stack(
    layout: DomLayout,
    config: StackConfig,
    on_complete: Callback<()>,
) -> Option<RunningStack> {
    let smoothing = config.smoothing;
    let mut stack = ScrollStack::new(config).ok()?;
    stack.capture_offsets(&layout).ok()?;

    let engine = Rc::new(RefCell::new(stack));
    let resized = Rc::new(Cell::new(false));
    let mut smooth = SmoothedScroll::new(scroll_y(), smoothing);

    let resize = {
        let resized = resized.clone();
        Listener::on_window("resize", move |_| resized.set(true))
    };

    let frames = {
        let engine = engine.clone();
        AnimationLoop::start(move || {
            let mut engine = engine.borrow_mut();
            if resized.replace(false) {
                // A failed re-measure keeps the previous layout.
                let _ = engine.invalidate_on_resize(&layout);
            }

            let output = engine.update(smooth.step(scroll_y()));
            for write in &output.writes {
                layout.paint(write.index, &write.transform, &write.filter);
            }

            if output.completed {
                let on_complete = on_complete.clone();
                set_timeout_detached(0, move || on_complete.emit(()));
            }
        })?
    };

    Some(RunningStack {
        engine,
        _frames: frames,
        _resize: resize,
    })
}
