// tests/event_classification.rs

use std::path::PathBuf;

use notify::event::{
    AccessKind, CreateKind, DataChange, EventKind, MetadataKind, ModifyKind, RemoveKind,
    RenameMode,
};

use syncwatcher::watch::{Disposition, FsEvent, FsOp, RegistrationEffect};

#[test]
fn notify_kinds_map_onto_operations() {
    let cases = [
        (EventKind::Create(CreateKind::File), Some(FsOp::Create)),
        (EventKind::Create(CreateKind::Folder), Some(FsOp::Create)),
        (EventKind::Remove(RemoveKind::Any), Some(FsOp::Remove)),
        (EventKind::Modify(ModifyKind::Data(DataChange::Content)), Some(FsOp::Write)),
        (EventKind::Modify(ModifyKind::Any), Some(FsOp::Write)),
        (EventKind::Modify(ModifyKind::Name(RenameMode::From)), Some(FsOp::Rename)),
        (EventKind::Modify(ModifyKind::Name(RenameMode::To)), Some(FsOp::Rename)),
        (
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
            Some(FsOp::PermissionChange),
        ),
        (EventKind::Access(AccessKind::Any), None),
        (EventKind::Any, None),
        (EventKind::Other, None),
    ];

    for (kind, expected) in cases {
        assert_eq!(FsOp::from_kind(&kind), expected, "{kind:?}");
    }
}

#[test]
fn only_permission_changes_are_ignored() {
    for op in [FsOp::Write, FsOp::Create, FsOp::Remove, FsOp::Rename] {
        assert_eq!(op.disposition(), Disposition::TriggersRun, "{op:?}");
    }
    assert_eq!(FsOp::PermissionChange.disposition(), Disposition::Ignored);
}

#[test]
fn registration_effects_are_total() {
    assert_eq!(FsOp::Create.registration_effect(), RegistrationEffect::RegisterIfDir);
    assert_eq!(FsOp::Remove.registration_effect(), RegistrationEffect::Unregister);
    assert_eq!(FsOp::Rename.registration_effect(), RegistrationEffect::Reconcile);
    assert_eq!(FsOp::Write.registration_effect(), RegistrationEffect::None);
    assert_eq!(FsOp::PermissionChange.registration_effect(), RegistrationEffect::None);
}

#[test]
fn from_notify_keeps_every_path() {
    let event = notify::Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
        .add_path(PathBuf::from("/proj/old"))
        .add_path(PathBuf::from("/proj/new"));

    let fs_event = FsEvent::from_notify(event).expect("rename is classified");
    assert_eq!(fs_event.op, FsOp::Rename);
    assert_eq!(
        fs_event.paths,
        vec![PathBuf::from("/proj/old"), PathBuf::from("/proj/new")]
    );

    let access = notify::Event::new(EventKind::Access(AccessKind::Any));
    assert_eq!(FsEvent::from_notify(access), None);
}
