use folio::events::{AppCommand, DataEvent, RequestFailure};
use folio::input::{Key, KeyEvent};
use folio::state::{ExitReason, NotificationKind};
use folio::testing::TestApp;
use folio::ui::screens::Screen;
use folio_api::endpoints::{Project, ProjectId, ProjectStatus, UserId};

fn project(title: &str, status: ProjectStatus, order: u32) -> Project {
    let now = chrono::Utc::now();
    Project {
        id: ProjectId::new_v4(),
        owner_id: UserId::new_v4(),
        title: title.to_string(),
        description: None,
        status,
        order,
        archived: false,
        created_at: now,
        updated_at: now,
    }
}

/// Server echo of an accepted status change
fn accepted(project: &Project, status: ProjectStatus) -> Project {
    Project {
        status,
        ..project.clone()
    }
}

/// Focus a status column from the leftmost one
fn focus_column(app: &mut TestApp, status: ProjectStatus) {
    for _ in 0..ProjectStatus::ALL.len() {
        app.send_key(Key::Char('h'));
    }
    for _ in 0..status.column() {
        app.send_key(Key::Char('l'));
    }
}

#[test]
fn test_quit_flow() {
    let mut app = TestApp::new();
    app.assert_not_quit();

    app.send_key(Key::Char('q'));

    app.assert_should_quit();
    assert_eq!(app.state().exit_reason, Some(ExitReason::Quit));
}

#[test]
fn test_ctrl_c_quits_even_with_help_open() {
    let mut app = TestApp::new();
    app.send_key(Key::Char('?'));
    app.send_key_event(KeyEvent::with_ctrl(Key::Char('c')));
    app.assert_should_quit();
}

#[test]
fn test_help_toggle() {
    let mut app = TestApp::new();
    assert!(!app.state().help_visible);

    app.send_key(Key::Char('?'));
    assert!(app.state().help_visible);

    app.send_key(Key::Esc);
    assert!(!app.state().help_visible);
}

#[test]
fn test_logs_screen_round_trip() {
    let mut app = TestApp::new();

    app.send_keys(&[Key::Char('g'), Key::Char('l')]);
    app.assert_screen_type(std::mem::discriminant(&Screen::Logs(Default::default())));
    assert_eq!(app.state().pending_key, None);

    app.send_key(Key::Char('h'));
    app.assert_screen_type(std::mem::discriminant(&Screen::Board));
}

#[test]
fn test_rejected_move_reverts_to_planning() {
    let site = project("Portfolio site", ProjectStatus::Planning, 0);
    let id = site.id;
    let mut app = TestApp::with_projects(vec![site]);

    focus_column(&mut app, ProjectStatus::Planning);
    app.send_key(Key::Char('L'));

    // Optimistic: the card is already in progress and the cursor followed it
    assert_eq!(app.project_status(id), Some(ProjectStatus::InProgress));
    assert_eq!(app.state().board.focused_status(), ProjectStatus::InProgress);
    let op_id = app.latest_op(id).unwrap();

    app.send_data_event(DataEvent::ProjectMoveFailed {
        op_id,
        failure: RequestFailure::Rejected("Invalid status".to_string()),
    });

    assert_eq!(app.project_status(id), Some(ProjectStatus::Planning));
    assert!(app.state().pending_moves.is_empty());
    let notification = app.state().notification.clone().unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert!(notification.message.contains("back in Planning"));
}

#[test]
fn test_concurrent_moves_resolve_independently() {
    let blog = project("Blog", ProjectStatus::Ideation, 0);
    let shop = project("Shop", ProjectStatus::Ideation, 1);
    let (blog_id, shop_id) = (blog.id, shop.id);
    let mut app = TestApp::with_projects(vec![blog.clone(), shop]);

    // Blog moves right, the cursor follows it; go back for the shop
    app.send_key(Key::Char('L'));
    let blog_op = app.latest_op(blog_id).unwrap();
    app.send_key(Key::Char('h'));
    app.send_key(Key::Char('L'));
    let shop_op = app.latest_op(shop_id).unwrap();

    assert_eq!(app.project_status(blog_id), Some(ProjectStatus::Researching));
    assert_eq!(app.project_status(shop_id), Some(ProjectStatus::Researching));
    assert_eq!(app.state().pending_moves.len(), 2);

    // Out of order: the second move fails first, then the first succeeds
    app.send_data_event(DataEvent::ProjectMoveFailed {
        op_id: shop_op,
        failure: RequestFailure::Network("connection reset".to_string()),
    });
    app.send_data_event(DataEvent::ProjectMoveCommitted {
        op_id: blog_op,
        project: accepted(&blog, ProjectStatus::Researching),
    });

    assert_eq!(app.project_status(blog_id), Some(ProjectStatus::Researching));
    assert_eq!(app.project_status(shop_id), Some(ProjectStatus::Ideation));
    assert!(app.state().pending_moves.is_empty());
}

#[test]
fn test_overlapping_moves_of_one_project() {
    let site = project("Site", ProjectStatus::Ideation, 0);
    let id = site.id;
    let mut app = TestApp::with_projects(vec![site]);

    // Two quick moves right: ideation -> researching -> planning
    app.send_keys(&[Key::Char('L'), Key::Char('L')]);
    assert_eq!(app.project_status(id), Some(ProjectStatus::Planning));

    let ops: Vec<_> = app.state().pending_moves.keys().copied().collect();
    assert_eq!(ops.len(), 2);

    // The first write fails after being superseded: view keeps the newer value
    app.send_data_event(DataEvent::ProjectMoveFailed {
        op_id: ops[0],
        failure: RequestFailure::Rejected("conflict".to_string()),
    });
    assert_eq!(app.project_status(id), Some(ProjectStatus::Planning));

    // The second fails too: back to the last status the server accepted
    app.send_data_event(DataEvent::ProjectMoveFailed {
        op_id: ops[1],
        failure: RequestFailure::Rejected("conflict".to_string()),
    });
    assert_eq!(app.project_status(id), Some(ProjectStatus::Ideation));
}

#[test]
fn test_earlier_move_failing_after_later_commit() {
    let site = project("Site", ProjectStatus::Ideation, 0);
    let id = site.id;
    let mut app = TestApp::with_projects(vec![site.clone()]);

    app.send_keys(&[Key::Char('L'), Key::Char('L')]);
    let ops: Vec<_> = app.state().pending_moves.keys().copied().collect();
    assert_eq!(ops.len(), 2);

    // The later write lands first
    let mut accepted = site;
    accepted.status = ProjectStatus::Planning;
    app.send_data_event(DataEvent::ProjectMoveCommitted {
        op_id: ops[1],
        project: accepted,
    });

    // The earlier one times out afterwards; the server still holds planning
    app.send_data_event(DataEvent::ProjectMoveFailed {
        op_id: ops[0],
        failure: RequestFailure::Network("timed out".to_string()),
    });

    assert_eq!(app.project_status(id), Some(ProjectStatus::Planning));
    assert!(app.state().pending_moves.is_empty());
}

#[test]
fn test_move_failing_on_expired_session_reverts_then_exits() {
    let site = project("Site", ProjectStatus::Planning, 0);
    let id = site.id;
    let mut app = TestApp::with_projects(vec![site]);

    focus_column(&mut app, ProjectStatus::Planning);
    app.send_key(Key::Char('L'));
    let op_id = app.latest_op(id).unwrap();

    app.send_data_event(DataEvent::ProjectMoveFailed {
        op_id,
        failure: RequestFailure::SessionExpired,
    });
    app.send_data_event(DataEvent::SessionExpired);

    assert_eq!(app.project_status(id), Some(ProjectStatus::Planning));
    app.assert_should_quit();
    assert_eq!(app.state().exit_reason, Some(ExitReason::SessionExpired));
}

#[test]
fn test_reload_during_move_keeps_optimistic_status() {
    let site = project("Site", ProjectStatus::Completed, 0);
    let id = site.id;
    let mut app = TestApp::with_projects(vec![site.clone()]);

    focus_column(&mut app, ProjectStatus::Completed);
    app.send_key(Key::Char('L'));
    app.send_key(Key::Char('r'));
    assert_eq!(app.executed().last(), Some(&AppCommand::LoadProjects));

    // The fetch raced the move and still has the old status
    app.send_data_event(DataEvent::ProjectsLoaded {
        projects: vec![site],
    });
    assert_eq!(app.project_status(id), Some(ProjectStatus::OnHold));
}

#[test]
fn test_archive_then_failure_restores_card() {
    let site = project("Site", ProjectStatus::Ideation, 0);
    let id = site.id;
    let mut app = TestApp::with_projects(vec![site]);

    app.send_key(Key::Char('a'));
    assert!(app.state().board.column(ProjectStatus::Ideation).is_empty());

    app.send_data_event(DataEvent::ProjectArchiveFailed {
        project_id: id,
        original_archived: false,
        failure: RequestFailure::NotFound,
    });
    assert_eq!(app.state().board.column(ProjectStatus::Ideation).len(), 1);

    // Archived cards can be shown again
    app.send_key(Key::Char('a'));
    app.send_key(Key::Char('A'));
    assert!(app.state().board.show_archived);
    assert_eq!(app.state().board.column(ProjectStatus::Ideation).len(), 1);
}

#[test]
fn test_logout_waits_for_server() {
    let mut app = TestApp::new();
    app.send_key(Key::Char('o'));
    assert_eq!(app.executed(), &[AppCommand::Logout]);
    app.assert_not_quit();

    app.send_data_event(DataEvent::LoggedOut);
    app.assert_should_quit();
    assert_eq!(app.state().exit_reason, Some(ExitReason::LoggedOut));
}

#[test]
fn test_notification_dismissed_with_esc() {
    let mut app = TestApp::new();
    app.send_data_event(DataEvent::LoadError {
        failure: RequestFailure::Network("refused".to_string()),
    });
    assert!(app.state().notification.is_some());

    app.send_key(Key::Esc);
    assert!(app.state().notification.is_none());
}
