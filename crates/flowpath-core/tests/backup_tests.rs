use flowpath_core::{Args, FlowStep, Orchestrator, RunEventKind, Transition, Workflow, WorkflowBuilder};

#[derive(Clone, Debug, PartialEq)]
struct Form {
    page: u8,
}

// Página que recuerda con qué formulario fue construida.
struct Page(Form);

impl FlowStep for Page {
    type Input = Form;
    type Output = Form;

    fn create(input: Form) -> Self {
        Page(input)
    }
}

struct Intro;
impl FlowStep for Intro {
    type Input = ();
    type Output = Form;
    fn create(_: ()) -> Self {
        Intro
    }
}

fn page_of(orchestrator: &Orchestrator, run: flowpath_core::RunHandle) -> Option<u8> {
    orchestrator.current(run).and_then(|c| c.downcast_ref::<Page>()).map(|p| p.0.page)
}

#[test]
fn backup_returns_to_nearest_loading_node_with_its_first_input() {
    // intro, page, page (salta la página 2), page
    let wf = WorkflowBuilder::new().then::<Intro>()
                                   .then::<Page>()
                                   .then_when::<Page, _>(|form: &Form| form.page != 2)
                                   .then::<Page>()
                                   .build_shared();
    let mut orchestrator = Orchestrator::new();
    let run = orchestrator.launch(wf, Args::none()).expect("launch");

    orchestrator.proceed(run, Form { page: 1 }).expect("to page 1");
    assert_eq!(page_of(&orchestrator, run), Some(1));
    let transition = orchestrator.proceed(run, Form { page: 2 }).expect("skip page 2");
    assert_eq!(transition, Transition::Activated { node_index: 3 });
    assert_eq!(page_of(&orchestrator, run), Some(2));

    let before = orchestrator.current(run).map(|c| c.handle()).expect("active");
    assert_eq!(orchestrator.backup(run).expect("backup"), Transition::Activated { node_index: 1 });
    assert_eq!(page_of(&orchestrator, run), Some(1));
    assert_ne!(orchestrator.current(run).map(|c| c.handle()), Some(before));

    assert_eq!(orchestrator.backup(run).expect("backup"), Transition::Activated { node_index: 0 });
    assert!(orchestrator.current(run).is_some_and(|c| c.is::<Intro>()));

    let backed: Vec<(usize, usize)> = orchestrator.events(run)
                                                  .into_iter()
                                                  .filter_map(|e| match e.kind {
                                                      RunEventKind::BackedUp { from, to } => Some((from, to)),
                                                      _ => None,
                                                  })
                                                  .collect();
    assert_eq!(backed, vec![(3, 1), (1, 0)]);
}

#[test]
fn backup_at_first_active_node_is_a_no_op() {
    let wf = Workflow::starting_with::<Intro>().then::<Page>().build_shared();
    let mut orchestrator = Orchestrator::new();
    let run = orchestrator.launch(wf, Args::none()).expect("launch");
    let handle = orchestrator.current(run).map(|c| c.handle()).expect("active");

    assert_eq!(orchestrator.backup(run).expect("backup"), Transition::Stayed);
    assert_eq!(orchestrator.position(run), Some(0));
    assert_eq!(orchestrator.current(run).map(|c| c.handle()), Some(handle));
}

#[test]
fn backup_over_skipped_leading_nodes_stays_put() {
    let wf = WorkflowBuilder::new().then_when::<Page, _>(|_| false)
                                   .then::<Page>()
                                   .then::<Page>()
                                   .build_shared();
    let mut orchestrator = Orchestrator::new();
    let run = orchestrator.launch(wf, Args::from_output(Form { page: 0 })).expect("launch");
    assert_eq!(orchestrator.position(run), Some(1));

    orchestrator.proceed(run, Form { page: 5 }).expect("proceed");
    assert_eq!(orchestrator.backup(run).expect("back"), Transition::Activated { node_index: 1 });
    assert_eq!(page_of(&orchestrator, run), Some(0));
    assert_eq!(orchestrator.backup(run).expect("first"), Transition::Stayed);
    assert_eq!(orchestrator.position(run), Some(1));
}

#[test]
fn proceeding_after_backup_uses_the_new_output() {
    let wf = Workflow::starting_with::<Intro>().then::<Page>().then::<Page>().build_shared();
    let mut orchestrator = Orchestrator::new();
    let run = orchestrator.launch(wf, Args::none()).expect("launch");
    orchestrator.proceed(run, Form { page: 1 }).expect("p1");
    orchestrator.proceed(run, Form { page: 2 }).expect("p2");
    orchestrator.backup(run).expect("back");
    orchestrator.proceed(run, Form { page: 7 }).expect("p2 again");
    assert_eq!(orchestrator.position(run), Some(2));
    assert_eq!(page_of(&orchestrator, run), Some(7));
}
