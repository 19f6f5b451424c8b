//! End-to-end behavior of `WebUi` over the headless engine.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use webui_common::{Color, Content, Size, WebUiError};
use webui_config::WebUiSettings;
use webui_core::encode::js_string_expr;
use webui_core::{
    AlertLevel, Binding, CloseResponse, DialogFlags, DialogKind, EngineState, MessageButtons,
    MessageResponse, WebUi,
};

use crate::{HeadlessController, HeadlessPlatform};

fn open(settings: WebUiSettings) -> (WebUi, HeadlessController) {
    let mut platform = HeadlessPlatform::new();
    let ui = WebUi::init(&mut platform, settings).unwrap();
    let controller = platform.last_controller().unwrap();
    (ui, controller)
}

fn collect_messages(ui: &mut WebUi) -> Rc<RefCell<Vec<String>>> {
    let messages = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&messages);
    ui.set_invoke_handler(move |_, text| sink.borrow_mut().push(text.to_string()))
        .unwrap();
    messages
}

// -- evaluation --

#[test]
fn eval_right_after_init_waits_for_placeholder() {
    let (mut ui, controller) = open(WebUiSettings::default());
    assert_eq!(ui.state(), EngineState::Loading);
    assert_eq!(controller.window().loads, 0);

    assert_eq!(ui.eval("1+1").unwrap(), "2");
    assert_eq!(ui.state(), EngineState::Ready);
    assert_eq!(controller.window().loads, 1);
}

#[test]
fn eval_returns_json_values() {
    let (mut ui, _) = open(WebUiSettings::default());
    assert_eq!(ui.eval("'hi'").unwrap(), "\"hi\"");
    assert_eq!(ui.eval("({a: [1, true]})").unwrap(), r#"{"a":[1,true]}"#);
    assert_eq!(ui.eval("var unused = 1").unwrap(), "null");
    let sum: f64 = ui.eval_as("[1, 2, 3].reduce(function(a, b) { return a + b; })").unwrap();
    assert_eq!(sum, 6.0);
}

#[test]
fn globals_persist_between_evals() {
    let (mut ui, _) = open(WebUiSettings::default());
    ui.eval("var counter = 41").unwrap();
    assert_eq!(ui.eval("++counter").unwrap(), "42");
}

#[test]
fn script_exceptions_are_script_errors() {
    let (mut ui, _) = open(WebUiSettings::default());
    let err = ui.eval("throw new Error('boom')").unwrap_err();
    assert!(matches!(&err, WebUiError::Script(msg) if msg.contains("boom")), "{err:?}");

    let err = ui.eval("nope()").unwrap_err();
    assert!(matches!(&err, WebUiError::Script(msg) if msg.contains("nope")), "{err:?}");

    let err = ui.eval("function (").unwrap_err();
    assert!(matches!(err, WebUiError::Script(_)));

    // The instance survives.
    assert_eq!(ui.state(), EngineState::Ready);
    assert_eq!(ui.eval("2*3").unwrap(), "6");
}

#[test]
fn encoded_text_round_trips_through_the_engine() {
    let (mut ui, _) = open(WebUiSettings::default());
    let samples = [
        "plain",
        "quotes \" and ' and \\ backslash",
        "<style> & </script>",
        "héllo wörld",
        "日本語 🚀",
        "100% sure %41",
        "line\nbreak\ttab\r",
        "",
    ];
    for text in samples {
        let back: String = ui.eval_as(&js_string_expr(text)).unwrap();
        assert_eq!(back, text);
    }
}

#[test]
fn timed_out_eval_leaves_instance_usable() {
    let mut settings = WebUiSettings::default();
    settings.engine.eval_timeout_ms = 50;
    let (mut ui, controller) = open(settings);
    ui.eval("0").unwrap();

    controller.pause();
    let err = ui.eval("'late'").unwrap_err();
    assert!(matches!(err, WebUiError::Timeout(_)));
    assert_eq!(ui.state(), EngineState::Ready);

    // The late script now completes first; its answer must not be taken
    // for this one.
    controller.resume();
    assert_eq!(ui.eval("'fresh'").unwrap(), "\"fresh\"");
}

// -- documents --

#[test]
fn placeholder_has_an_app_element() {
    let (mut ui, _) = open(WebUiSettings::default());
    assert_eq!(ui.eval("document.getElementById('app') !== null").unwrap(), "true");
    assert_eq!(ui.eval("document.body.firstChild.id").unwrap(), "\"app\"");
}

#[test]
fn static_markup_is_queryable() {
    let html = r#"<body><div id="greeting" class="big">hello <b>there</b></div>
        <script>external.invoke(document.getElementById('greeting').textContent);</script></body>"#;
    let (mut ui, _) = open(WebUiSettings::with_html(html));
    let messages = collect_messages(&mut ui);
    assert_eq!(
        ui.eval("document.getElementById('greeting').getAttribute('class')").unwrap(),
        "\"big\""
    );
    assert_eq!(ui.eval("document.getElementsByTagName('b').length").unwrap(), "1");
    assert_eq!(*messages.borrow(), vec!["hello there"]);
}

#[test]
fn commented_out_scripts_do_not_run() {
    let html = "<body><!-- <script>external.invoke('hidden')</script> -->\
                <script>external.invoke('shown')</script></body>";
    let (mut ui, _) = open(WebUiSettings::with_html(html));
    let messages = collect_messages(&mut ui);
    ui.eval("0").unwrap();
    assert_eq!(*messages.borrow(), vec!["shown"]);
}

// -- styles --

#[test]
fn inject_css_adds_exactly_one_style_element() {
    let (mut ui, _) = open(WebUiSettings::default());
    ui.inject_css("body{color:red}").unwrap();

    let count: usize = ui
        .eval_as("document.getElementsByTagName('style').length")
        .unwrap();
    assert_eq!(count, 1);
    let text: String = ui
        .eval_as("document.head.getElementsByTagName('style')[0].textContent")
        .unwrap();
    assert_eq!(text, "body{color:red}");
    let kind: String = ui
        .eval_as("document.getElementsByTagName('style')[0].getAttribute('type')")
        .unwrap();
    assert_eq!(kind, "text/css");
}

#[test]
fn inject_css_keeps_unicode_and_quotes() {
    let (mut ui, _) = open(WebUiSettings::default());
    let css = "p::before{content:\"→ 'ü' 100%\"}";
    ui.inject_css(css).unwrap();
    let text: String = ui
        .eval_as("document.getElementsByTagName('style')[0].textContent")
        .unwrap();
    assert_eq!(text, css);
}

// -- external invoke --

#[test]
fn messages_arrive_in_order() {
    let (mut ui, _) = open(WebUiSettings::default());
    let messages = collect_messages(&mut ui);
    ui.eval("external.invoke('a'); window.external.invoke('b'); external.invoke(3)")
        .unwrap();
    assert_eq!(*messages.borrow(), vec!["a", "b", "3"]);
}

#[test]
fn inline_scripts_run_on_load() {
    let html = "<html><head><title>Doc</title></head><body>\
                <script>external.invoke('loaded'); var ready = true;</script></body></html>";
    let (mut ui, _) = open(WebUiSettings::with_html(html));
    let messages = collect_messages(&mut ui);

    assert_eq!(ui.eval("ready").unwrap(), "true");
    assert_eq!(ui.eval("document.title").unwrap(), "\"Doc\"");
    assert_eq!(*messages.borrow(), vec!["loaded"]);
}

#[test]
fn data_url_documents_are_decoded() {
    let url = "data:text/html,%3Cscript%3Eexternal.invoke('hi')%3C%2Fscript%3E";
    let (mut ui, controller) = open(WebUiSettings::with_url(url));
    let messages = collect_messages(&mut ui);
    ui.eval("0").unwrap();
    assert_eq!(*messages.borrow(), vec!["hi"]);
    assert_eq!(controller.window().location, url);
}

#[test]
fn handler_can_reply_with_eval() {
    let (mut ui, _) = open(WebUiSettings::default());
    ui.set_invoke_handler(|ui, text| {
        let reply = format!("window.reply = {};", js_string_expr(&text.to_uppercase()));
        ui.eval(&reply).unwrap();
    })
    .unwrap();
    ui.eval("external.invoke('ping')").unwrap();
    assert_eq!(ui.eval("window.reply").unwrap(), "\"PING\"");
}

#[test]
fn message_sent_while_handler_evals_is_not_lost() {
    let (mut ui, _) = open(WebUiSettings::default());
    let messages = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&messages);
    ui.set_invoke_handler(move |ui, text| {
        if text == "a" {
            ui.eval("external.invoke('b')").unwrap();
        }
        sink.borrow_mut().push(text.to_string());
    })
    .unwrap();
    ui.eval("external.invoke('a')").unwrap();
    assert_eq!(*messages.borrow(), vec!["a", "b"]);
}

// -- bindings --

#[test]
fn binding_round_trip() {
    let html = "<script>window.counter = { render: function(d) { document.title = 'count ' + d.count; } };</script>";
    let (mut ui, _) = open(WebUiSettings::with_html(html));

    let count = Rc::new(RefCell::new(0i64));
    let add = Rc::clone(&count);
    let read = Rc::clone(&count);
    ui.bind(
        Binding::new("counter")
            .method("add_n", 1, move |params| {
                *add.borrow_mut() += params[0].as_i64().ok_or("expected a number")?;
                Ok(())
            })
            .state(move || serde_json::json!({ "count": *read.borrow() })),
    )
    .unwrap();
    assert_eq!(ui.eval("counter.data.count").unwrap(), "0");

    ui.eval("counter.addN(5)").unwrap();
    assert_eq!(*count.borrow(), 5);
    assert_eq!(ui.eval("counter.data.count").unwrap(), "5");
    assert_eq!(ui.eval("document.title").unwrap(), "\"count 5\"");
}

#[test]
fn unclaimed_messages_fall_through_to_handler() {
    let (mut ui, _) = open(WebUiSettings::default());
    ui.bind(Binding::new("app").method("noop", 0, |_| Ok(()))).unwrap();
    let messages = collect_messages(&mut ui);
    ui.eval("app.noop(); external.invoke('{\"scope\":\"other\",\"method\":\"x\"}'); external.invoke('raw')")
        .unwrap();
    assert_eq!(
        *messages.borrow(),
        vec![r#"{"scope":"other","method":"x"}"#, "raw"]
    );
}

#[test]
fn bindings_survive_navigation() {
    let (mut ui, controller) = open(WebUiSettings::default());
    ui.bind(Binding::new("app").method("ping", 0, |_| Ok(())).state(|| 7))
        .unwrap();

    controller.navigate(Content::Html("<p>second</p>".into()));
    ui.eval("0").unwrap();
    assert_eq!(ui.eval("typeof app.ping").unwrap(), "\"function\"");
    assert_eq!(ui.eval("app.data").unwrap(), "7");
    assert_eq!(controller.window().loads, 2);
    assert_eq!(ui.state(), EngineState::Ready);
}

#[test]
fn sync_binding_pushes_host_side_changes() {
    let (mut ui, _) = open(WebUiSettings::default());
    let count = Rc::new(Cell::new(1));
    let read = Rc::clone(&count);
    ui.bind(Binding::new("counter").state(move || serde_json::json!({ "count": read.get() })))
        .unwrap();
    assert_eq!(ui.eval("counter.data.count").unwrap(), "1");

    count.set(10);
    assert_eq!(ui.eval("counter.data.count").unwrap(), "1");
    ui.sync_binding("counter").unwrap();
    assert_eq!(ui.eval("counter.data.count").unwrap(), "10");
    assert!(matches!(
        ui.sync_binding("missing"),
        Err(WebUiError::InvalidState(_))
    ));
}

// -- dispatch --

#[test]
fn work_posted_from_another_thread_runs_on_the_loop() {
    let (mut ui, controller) = open(WebUiSettings::default());
    ui.eval("0").unwrap();
    let dispatcher = ui.dispatcher();

    let worker = std::thread::spawn(move || {
        dispatcher
            .post(|ui: &mut WebUi| ui.set_title("from thread").unwrap())
            .unwrap();
    });

    while controller.window().title != "from thread" {
        ui.loop_once(true).unwrap();
    }
    worker.join().unwrap();
}

#[test]
fn dispatched_work_can_eval() {
    let (mut ui, _) = open(WebUiSettings::default());
    ui.dispatch(|ui| {
        ui.eval("window.touched = true").unwrap();
    })
    .unwrap();
    assert_eq!(ui.eval("window.touched === true").unwrap(), "true");
}

// -- closing --

#[test]
fn denied_close_keeps_loop_running() {
    let (mut ui, controller) = open(WebUiSettings::default());
    ui.eval("0").unwrap();
    ui.set_close_handler(|_| CloseResponse::Deny).unwrap();

    controller.request_close();
    assert!(!ui.loop_once(true).unwrap());
    assert!(!ui.loop_once(false).unwrap());
    assert_eq!(ui.state(), EngineState::Ready);

    ui.set_close_handler(|_| CloseResponse::Allow).unwrap();
    controller.request_close();
    ui.run().unwrap();
    assert!(ui.is_closed());
    assert!(controller.is_closed());
}

#[test]
fn second_close_request_waits_for_the_handler() {
    let (mut ui, controller) = open(WebUiSettings::default());
    ui.eval("0").unwrap();
    let asked = Rc::new(Cell::new(0));
    let counter = Rc::clone(&asked);
    let remote = controller.clone();
    ui.set_close_handler(move |ui| {
        counter.set(counter.get() + 1);
        // The user clicks close again while the page is being asked.
        remote.request_close();
        ui.eval("1").unwrap();
        CloseResponse::Deny
    })
    .unwrap();

    controller.request_close();
    assert!(!ui.loop_once(true).unwrap());
    assert!(!ui.loop_once(false).unwrap());
    assert_eq!(ui.state(), EngineState::Ready);
    assert_eq!(asked.get(), 1);
    assert!(!controller.is_closed());
}

#[test]
fn destroyed_window_stops_the_loop() {
    let (mut ui, controller) = open(WebUiSettings::default());
    ui.eval("0").unwrap();
    controller.destroy();
    assert!(ui.loop_once(true).unwrap());
    assert!(matches!(ui.eval("1"), Err(WebUiError::InvalidState(_))));
    ui.exit();
}

#[test]
fn everything_but_exit_fails_after_exit() {
    let (mut ui, controller) = open(WebUiSettings::default());
    ui.eval("0").unwrap();
    let dispatcher = ui.dispatcher();
    ui.exit();
    assert!(controller.is_closed());

    assert!(matches!(ui.eval("1"), Err(WebUiError::InvalidState(_))));
    assert!(matches!(ui.inject_css("a{}"), Err(WebUiError::InvalidState(_))));
    assert!(matches!(ui.loop_once(false), Err(WebUiError::InvalidState(_))));
    assert!(matches!(ui.terminate(), Err(WebUiError::InvalidState(_))));
    assert!(matches!(ui.set_title("x"), Err(WebUiError::InvalidState(_))));
    assert!(matches!(
        dispatcher.post(|_| {}),
        Err(WebUiError::InvalidState(_))
    ));
    ui.exit();
    assert_eq!(ui.state(), EngineState::Closed);
}

// -- window state and dialogs --

#[test]
fn settings_reach_the_window() {
    let mut settings = WebUiSettings::with_html("<p></p>").title("Counter");
    settings.window.background = Some("#336699".into());
    settings.window.min_width = 200;
    settings.window.min_height = 100;
    let (mut ui, controller) = open(settings);

    let window = controller.window();
    assert_eq!(window.title, "Counter");
    assert_eq!(window.size, Size::new(640, 480));
    assert_eq!(window.min_size, Size::new(200, 100));
    assert_eq!(window.background, Some(Color::from_rgba(0x33, 0x66, 0x99, 255)));

    ui.set_title("Renamed").unwrap();
    ui.set_fullscreen(true).unwrap();
    ui.set_min_size(Size::new(300, 200)).unwrap();
    let window = controller.window();
    assert_eq!(window.title, "Renamed");
    assert!(window.fullscreen);
    assert_eq!(window.min_size, Size::new(300, 200));
}

#[test]
fn dialogs_use_queued_answers() {
    let (mut ui, controller) = open(WebUiSettings::default());
    controller.queue_dialog_answer("/tmp/notes.txt");
    controller.queue_message_answer(MessageResponse::Yes);

    let path = ui
        .dialog(DialogKind::Open, DialogFlags::default(), "Open", "")
        .unwrap();
    assert_eq!(path, "/tmp/notes.txt");
    let cancelled = ui
        .dialog(DialogKind::Save, DialogFlags::default(), "Save", "")
        .unwrap();
    assert_eq!(cancelled, "");
    let alert = ui
        .dialog(
            DialogKind::Alert,
            DialogFlags::alert(AlertLevel::Warning),
            "Careful",
            "Disk almost full",
        )
        .unwrap();
    assert_eq!(alert, "");

    let answer = ui
        .message_box(AlertLevel::Info, MessageButtons::YesNo, "Save?", "Save changes?")
        .unwrap();
    assert_eq!(answer, MessageResponse::Yes);
    let dismissed = ui
        .message_box(AlertLevel::Info, MessageButtons::OkCancel, "Again?", "")
        .unwrap();
    assert_eq!(dismissed, MessageResponse::Cancel);

    let window = controller.window();
    assert_eq!(window.dialogs.len(), 3);
    assert_eq!(window.dialogs[2].arg, "Disk almost full");
    assert_eq!(window.message_boxes.len(), 2);
}
