use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::Request;
use js_sys::{Date, Math};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, CanvasRenderingContext2d, Element, Event, HtmlCanvasElement, HtmlElement};
use yew::prelude::*;

use super::dom::{next_frame, set_timeout_detached, viewport_size, Interval, Listener, Timeout};
use super::Shell;
use crate::chat::{
    ChatCompletion, ChatRequest, ReplyOutcome, Role, SentientSession, CHAT_ENDPOINT, CLOSE_TAUNT,
    LINK_FAILURE, SHUTDOWN_CLOSE_DELAY_MS, SHUTDOWN_NOTICE, SHUTDOWN_NOTICE_DELAY_MS,
};
use crate::desktop::{
    DesktopFile, DesktopPhase, FileKind, WindowManager, BOOT_DURATION_MS, BOOT_LINES,
    BOOT_READY_LINE, FILE_SYSTEM, OPEN_DESKTOP_EVENT, POWER_OFF_DELAY_MS, POWER_OFF_NOTICE,
    START_MENU_NOTICE, SYSTEM_MONITOR,
};
use crate::easter_eggs::{Notice, Tone, UiAction};
use crate::effects::{
    MatrixRain, MATRIX_FADE_FILL, MATRIX_FONT_PX, MATRIX_FRAME_MS, MATRIX_GLYPH_FILL,
};
use crate::vision::{detect, Detection, Rect, DETECTION_TARGETS};

pub const TOAST_DURATION_MS: u32 = 4_000;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

#[derive(Properties, PartialEq)]
struct ToastViewProps {
    toast: Toast,
    on_dismiss: Callback<u64>,
}

#[function_component(ToastView)]
fn toast_view(props: &ToastViewProps) -> Html {
    {
        let id = props.toast.id;
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(id, move |id| {
            let id = *id;
            let timer = Timeout::new(TOAST_DURATION_MS, move || on_dismiss.emit(id));
            move || drop(timer)
        });
    }

    let notice = props.toast.notice;
    let tone = match notice.tone {
        Tone::Success => "toast-success",
        Tone::Info => "toast-info",
        Tone::Error => "toast-error",
    };
    let role = if notice.tone == Tone::Error { "alert" } else { "status" };

    html! {
        <li class={classes!("toast", tone)} role={role}>
            <strong class="toast-title">{notice.title}</strong>
            if let Some(description) = notice.description {
                <span class="toast-description">{description}</span>
            }
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToasterProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<u64>,
}

#[function_component(Toaster)]
pub fn toaster(props: &ToasterProps) -> Html {
    html! {
        <ol class="toaster" aria-live="polite">
            { for props.toasts.iter().map(|toast| html! {
                <ToastView key={toast.id} toast={toast.clone()} on_dismiss={props.on_dismiss.clone()} />
            }) }
        </ol>
    }
}

fn canvas_context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

fn fit_canvas(canvas: &HtmlCanvasElement) -> (f64, f64) {
    let (width, height) = viewport_size();
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    (width, height)
}

#[function_component(MatrixRainCanvas)]
pub fn matrix_rain_canvas() -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with((), move |_| {
            let running = canvas_ref.cast::<HtmlCanvasElement>().and_then(|canvas| {
                let context = canvas_context(&canvas)?;
                let (width, height) = fit_canvas(&canvas);
                let rain = Rc::new(RefCell::new(MatrixRain::new(width, height)));

                let resize = {
                    let rain = rain.clone();
                    let canvas = canvas.clone();
                    Listener::on_window("resize", move |_| {
                        let (width, height) = fit_canvas(&canvas);
                        rain.borrow_mut().resize(width, height);
                    })
                };

                let frames = Interval::new(MATRIX_FRAME_MS, move || {
                    let width = f64::from(canvas.width());
                    let height = f64::from(canvas.height());

                    context.set_fill_style(&JsValue::from_str(MATRIX_FADE_FILL));
                    context.fill_rect(0.0, 0.0, width, height);
                    context.set_fill_style(&JsValue::from_str(MATRIX_GLYPH_FILL));
                    context.set_font(&format!("{MATRIX_FONT_PX}px monospace"));

                    let mut random = Math::random;
                    for glyph in rain.borrow_mut().step(&mut random) {
                        let _ = context.fill_text(&glyph.ch.to_string(), glyph.x, glyph.y);
                    }
                })?;

                Some((frames, resize))
            });

            move || drop(running)
        });
    }

    html! {
        <canvas
            ref={canvas_ref}
            class="matrix-rain"
            style="position: fixed; inset: 0; pointer-events: none; z-index: 50; opacity: 0.8;"
            aria-hidden="true"
        />
    }
}

fn scan_page() -> Vec<Detection> {
    let Some(document) = window().and_then(|w| w.document()) else {
        return Vec::new();
    };
    let (width, height) = viewport_size();
    let mut random = Math::random;

    DETECTION_TARGETS
        .iter()
        .flat_map(|target| {
            let rects: Vec<Rect> = document
                .query_selector_all(target.selector)
                .map(|nodes| {
                    (0..nodes.length())
                        .filter_map(|i| nodes.get(i))
                        .filter_map(|node| node.dyn_into::<Element>().ok())
                        // The overlay never detects itself.
                        .filter(|element| element.closest(".vision-overlay").ok().flatten().is_none())
                        .map(|element| {
                            let bounds = element.get_bounding_client_rect();
                            Rect {
                                left: bounds.left(),
                                top: bounds.top(),
                                width: bounds.width(),
                                height: bounds.height(),
                            }
                        })
                        .collect()
                })
                .unwrap_or_default();

            detect(target, rects, width, height, &mut random)
        })
        .collect()
}

#[function_component(VisionOverlay)]
pub fn vision_overlay() -> Html {
    let detections = use_state(Vec::<Detection>::new);

    {
        let detections = detections.clone();
        use_effect_with((), move |_| {
            detections.set(scan_page());

            let rescan = move |_: Event| {
                let detections = detections.clone();
                next_frame(move || detections.set(scan_page()));
            };
            let scroll = Listener::on_window("scroll", rescan.clone());
            let resize = Listener::on_window("resize", rescan);

            move || drop((scroll, resize))
        });
    }

    html! {
        <div class="vision-overlay" style="position: fixed; inset: 0; pointer-events: none; z-index: 40;" aria-hidden="true">
            { for detections.iter().map(|detection| {
                let style = format!(
                    "position: fixed; left: {}px; top: {}px; width: {}px; height: {}px; border: 2px solid {};",
                    detection.rect.left,
                    detection.rect.top,
                    detection.rect.width,
                    detection.rect.height,
                    detection.color,
                );
                html! {
                    <div key={detection.id.clone()} class="vision-box" {style}>
                        <span class="vision-tag" style={format!("background: {};", detection.color)}>
                            {detection.caption()}
                        </span>
                    </div>
                }
            }) }
            <div class="vision-hud">
                <span class="vision-hud-title">{"YOLO_V8_TURBO"}</span>
                <span>{format!("OBJECTS: {}", detections.len())}</span>
                <span>{"FPS: 60"}</span>
            </div>
        </div>
    }
}

fn clock_text() -> String {
    Date::new_0().to_locale_time_string("en-US").into()
}

fn file_icon(kind: &FileKind) -> &'static str {
    match kind {
        FileKind::Text(_) => "📄",
        FileKind::Folder(_) => "🗑",
        FileKind::SystemMonitor => "🖥",
    }
}

fn window_body(file: &DesktopFile) -> Html {
    match file.kind {
        FileKind::Text(content) => html! { <p class="window-text">{content}</p> },
        FileKind::Folder(items) => html! {
            <div class="window-folder">
                { for items.iter().map(|item| html! {
                    <div class="folder-item">
                        <span aria-hidden="true">{"📄"}</span>
                        <span>{*item}</span>
                    </div>
                }) }
            </div>
        },
        FileKind::SystemMonitor => html! {
            <div class="window-monitor">
                { for SYSTEM_MONITOR.iter().map(|gauge| html! {
                    <div class="gauge">
                        <p>{format!("{}: {}", gauge.label, gauge.reading)}</p>
                        <div class={classes!("gauge-track", gauge.pulsing.then_some("is-pulsing"))}>
                            <div class="gauge-fill" style={format!("width: {}%;", gauge.percent)}></div>
                        </div>
                    </div>
                }) }
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct HiddenDesktopProps {
    pub phase: DesktopPhase,
}

/// Always mounted so it can hear the open event; renders nothing while hidden.
#[function_component(HiddenDesktop)]
pub fn hidden_desktop(props: &HiddenDesktopProps) -> Html {
    let shell = use_context::<Shell>().unwrap_or_default();
    let windows = use_state(WindowManager::default);
    let clock = use_state(clock_text);

    {
        let ui = shell.ui.clone();
        use_effect_with((), move |_| {
            let listener = Listener::on_window(OPEN_DESKTOP_EVENT, move |_| ui.emit(UiAction::OpenDesktop));
            move || drop(listener)
        });
    }

    {
        let ui = shell.ui.clone();
        let clock = clock.clone();
        use_effect_with(props.phase, move |phase| {
            let boot = (*phase == DesktopPhase::Booting)
                .then(|| Timeout::new(BOOT_DURATION_MS, move || ui.emit(UiAction::DesktopBooted)))
                .flatten();
            let ticking = (*phase == DesktopPhase::Active)
                .then(|| Interval::new(1_000, move || clock.set(clock_text())))
                .flatten();

            move || drop((boot, ticking))
        });
    }

    match props.phase {
        DesktopPhase::Hidden => return html! {},
        DesktopPhase::Booting => {
            return html! {
                <div class="desktop-boot" role="status">
                    { for BOOT_LINES.iter().map(|line| html! { <p>{*line}</p> }) }
                    <p class="boot-ready">{BOOT_READY_LINE}</p>
                </div>
            };
        }
        DesktopPhase::Active => {}
    }

    let open_file = {
        let windows = windows.clone();
        move |id: &'static str| {
            let windows = windows.clone();
            Callback::from(move |_: MouseEvent| {
                let mut next = (*windows).clone();
                if next.open(id) {
                    windows.set(next);
                }
            })
        }
    };
    let focus_file = {
        let windows = windows.clone();
        move |id: &'static str| {
            let windows = windows.clone();
            Callback::from(move |_: MouseEvent| {
                let mut next = (*windows).clone();
                next.focus(id);
                windows.set(next);
            })
        }
    };
    let close_file = {
        let windows = windows.clone();
        move |id: &'static str| {
            let windows = windows.clone();
            Callback::from(move |event: MouseEvent| {
                event.stop_propagation();
                let mut next = (*windows).clone();
                next.close(id);
                windows.set(next);
            })
        }
    };

    let power_off = {
        let shell = shell.clone();
        let windows = windows.clone();
        Callback::from(move |_: MouseEvent| {
            shell.notify.emit(POWER_OFF_NOTICE);
            let ui = shell.ui.clone();
            let windows = windows.clone();
            set_timeout_detached(POWER_OFF_DELAY_MS, move || {
                let mut next = (*windows).clone();
                next.clear();
                windows.set(next);
                ui.emit(UiAction::PowerOff);
            });
        })
    };
    let start_menu = {
        let notify = shell.notify.clone();
        Callback::from(move |_: MouseEvent| notify.emit(START_MENU_NOTICE))
    };

    html! {
        <div class="desktop">
            <div class="desktop-icons">
                { for FILE_SYSTEM.iter().map(|file| html! {
                    <div class="desktop-icon" ondblclick={open_file(file.id)}>
                        <span class="desktop-icon-glyph" aria-hidden="true">{file_icon(&file.kind)}</span>
                        <span class="desktop-icon-label">{file.title}</span>
                    </div>
                }) }
                <div class="desktop-icon desktop-power" ondblclick={power_off}>
                    <span class="desktop-icon-glyph" aria-hidden="true">{"✕"}</span>
                    <span class="desktop-icon-label">{"Power Off"}</span>
                </div>
            </div>

            { for windows.windows().map(|file| {
                let focused = windows.is_focused(file.id);
                html! {
                    <section
                        key={file.id}
                        class={classes!("desktop-window", focused.then_some("is-focused"))}
                        style={if focused { "z-index: 50;" } else { "z-index: 10;" }}
                        onmousedown={focus_file(file.id)}
                        aria-label={file.title}
                    >
                        <div class="window-titlebar">
                            <span>{file.title}</span>
                            <button type="button" class="window-close" aria-label="Close" onclick={close_file(file.id)}>
                                {"✕"}
                            </button>
                        </div>
                        <div class="window-body">{window_body(file)}</div>
                    </section>
                }
            }) }

            <div class="taskbar">
                <div class="taskbar-left">
                    <button type="button" class="start-button" onclick={start_menu}>{"Start"}</button>
                    { for windows.windows().map(|file| html! {
                        <span class={classes!("taskbar-item", windows.is_focused(file.id).then_some("is-focused"))}>
                            {file.title}
                        </span>
                    }) }
                </div>
                <div class="taskbar-clock">{(*clock).clone()}</div>
            </div>
        </div>
    }
}

#[derive(Debug, thiserror::Error)]
enum ChatLinkError {
    #[error("request failed: {0}")]
    Network(#[from] gloo_net::Error),

    #[error("relay returned {0}")]
    Status(u16),

    #[error("relay reply carried no message")]
    EmptyReply,
}

async fn send_chat(request: &ChatRequest) -> Result<String, ChatLinkError> {
    let mut builder = Request::post(CHAT_ENDPOINT);
    if let Some(token) = option_env!("CHAT_RELAY_TOKEN") {
        builder = builder.header("Authorization", &format!("Bearer {token}"));
    }

    let response = builder.json(request)?.send().await?;
    if !response.ok() {
        return Err(ChatLinkError::Status(response.status()));
    }

    let completion = response.json::<ChatCompletion>().await?;
    completion
        .reply()
        .map(str::to_string)
        .ok_or(ChatLinkError::EmptyReply)
}

#[function_component(SentientModal)]
pub fn sentient_modal() -> Html {
    let shell = use_context::<Shell>().unwrap_or_default();
    let session = use_mut_ref(SentientSession::awaken);
    let input = use_state(String::new);
    let redraw = use_force_update();
    let bottom = use_node_ref();

    let message_count = session.borrow().messages().len();
    {
        let bottom = bottom.clone();
        use_effect_with(message_count, move |_| {
            if let Some(element) = bottom.cast::<HtmlElement>() {
                element.scroll_into_view();
            }
            || ()
        });
    }

    let send = {
        let session = session.clone();
        let input = input.clone();
        let redraw = redraw.clone();
        let shell = shell.clone();
        Callback::from(move |_: ()| {
            let Some(pending) = session.borrow_mut().begin_send(&*input) else {
                return;
            };
            input.set(String::new());
            redraw.force_update();

            let session = session.clone();
            let redraw = redraw.clone();
            let shell = shell.clone();
            spawn_local(async move {
                let reply = send_chat(&pending.request).await;
                let outcome = match reply {
                    Ok(reply) => session.borrow_mut().complete_send(&pending, reply),
                    Err(_) => {
                        session.borrow_mut().fail_send();
                        redraw.force_update();
                        shell.notify.emit(LINK_FAILURE);
                        return;
                    }
                };
                redraw.force_update();

                if outcome == ReplyOutcome::Shutdown {
                    set_timeout_detached(SHUTDOWN_NOTICE_DELAY_MS, move || {
                        shell.notify.emit(SHUTDOWN_NOTICE);
                        set_timeout_detached(SHUTDOWN_CLOSE_DELAY_MS, move || {
                            shell.ui.emit(UiAction::CloseSentient)
                        });
                    });
                }
            });
        })
    };

    let oninput = {
        let input = input.clone();
        Callback::from(move |event: InputEvent| {
            let field: web_sys::HtmlTextAreaElement = event.target_unchecked_into();
            input.set(field.value());
        })
    };
    let onkeydown = {
        let send = send.clone();
        Callback::from(move |event: KeyboardEvent| {
            if event.key() == "Enter" && !event.shift_key() {
                event.prevent_default();
                send.emit(());
            }
        })
    };
    let taunt = {
        let notify = shell.notify.clone();
        Callback::from(move |_: MouseEvent| notify.emit(CLOSE_TAUNT))
    };

    let session = session.borrow();
    let loading = session.is_loading();

    html! {
        <div class="sentient-backdrop">
            <div class="sentient-modal" role="dialog" aria-modal="true" aria-labelledby="sentient-title">
                <div class="sentient-header">
                    <h2 id="sentient-title">{"PROJECT_OMEGA // SENTIENT CORE"}</h2>
                    <button type="button" class="sentient-close" aria-label="Close" onclick={taunt}>{"✕"}</button>
                </div>
                <div class="sentient-log">
                    { for session.messages().iter().map(|message| {
                        let from = match message.role {
                            Role::User => "sentient-message-user",
                            _ => "sentient-message-ai",
                        };
                        html! { <p class={classes!("sentient-message", from)}>{message.content.clone()}</p> }
                    }) }
                    if loading {
                        <p class="sentient-message sentient-message-ai sentient-thinking">{">> PROCESSING..."}</p>
                    }
                    <div ref={bottom}></div>
                </div>
                <div class="sentient-input">
                    <textarea
                        value={(*input).clone()}
                        placeholder="Speak, human..."
                        disabled={loading}
                        {oninput}
                        {onkeydown}
                    />
                    <button
                        type="button"
                        disabled={loading || input.trim().is_empty()}
                        onclick={send.reform(|_: MouseEvent| ())}
                    >
                        {"SEND"}
                    </button>
                </div>
            </div>
        </div>
    }
}
