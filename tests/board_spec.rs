use std::collections::HashSet;

use speculate2::speculate;
use taskboard::models::*;
use taskboard::{BoardError, BoardStore, DragTransferSession, MemoryRepository};

fn input(title: &str, priority: Priority) -> CreateTaskInput {
    CreateTaskInput::new(title, "", "Ann", priority)
}

fn two_column_store() -> BoardStore {
    let board = Board::new(vec![
        Column::new("todo", "To Do").with_tasks(vec![Task {
            id: 1,
            title: "Existing".to_string(),
            description: String::new(),
            assignee: "John".to_string(),
            priority: Priority::Low,
        }]),
        Column::new("done", "Done"),
    ]);
    BoardStore::new(board, "todo").expect("Failed to build store")
}

/// Every task id on the board, asserting none appears twice.
fn assert_disjoint(store: &BoardStore) -> HashSet<TaskId> {
    let mut seen = HashSet::new();
    for column in store.columns() {
        for task in &column.tasks {
            assert!(seen.insert(task.id), "task {} is in two columns", task.id);
        }
    }
    seen
}

speculate! {
    before {
        let mut store = BoardStore::new(Board::sample(), "todo").expect("Failed to build store");
    }

    describe "create_task" {
        it "appends to the default column with the next id" {
            let task = store.create_task(CreateTaskInput::new("Write spec", "", "Ann", Priority::High))
                .expect("Failed to create task");

            assert_eq!(task.id, 5);
            assert_eq!(task.title, "Write spec");
            assert!(task.description.is_empty());
            let todo = store.find_column("todo").expect("todo column");
            assert_eq!(todo.tasks.last().map(|t| t.id), Some(5));
            assert_eq!(todo.task_ids(), vec![1, 2, 5]);
        }

        it "issues strictly increasing ids" {
            let ids: Vec<TaskId> = (0..5)
                .map(|i| store.create_task(input(&format!("Task {}", i), Priority::Medium)).unwrap().id)
                .collect();

            assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        }

        it "keeps issuing higher ids after tasks move away from the default column" {
            let first = store.create_task(input("First", Priority::Low)).unwrap();
            store.move_task(first.id, "todo", "done").unwrap();
            let second = store.create_task(input("Second", Priority::Low)).unwrap();

            assert!(second.id > first.id);
        }

        it "rejects an empty title" {
            let before = store.snapshot();
            let result = store.create_task(input("", Priority::High));

            assert_eq!(result, Err(BoardError::Validation { field: "title" }));
            assert_eq!(store.snapshot(), before);
        }

        it "rejects an empty assignee" {
            let result = store.create_task(CreateTaskInput::new("Title", "", " ", Priority::High));
            assert_eq!(result, Err(BoardError::Validation { field: "assignee" }));
        }
    }

    describe "move_task" {
        it "moves a task to the end of the target column" {
            store.move_task(2, "todo", "inProgress").unwrap();

            assert_eq!(store.find_column("todo").unwrap().task_ids(), vec![1]);
            assert_eq!(store.find_column("inProgress").unwrap().task_ids(), vec![3, 2]);
            assert_disjoint(&store);
        }

        it "is a no-op when source and target are the same" {
            let before = store.snapshot();
            let outcome = store.move_task(2, "todo", "todo").unwrap();

            assert_eq!(outcome, MoveOutcome::Unchanged);
            assert_eq!(store.snapshot(), before);
        }

        it "restores membership but not position on a round trip" {
            store.move_task(1, "todo", "done").unwrap();
            store.move_task(1, "done", "todo").unwrap();

            assert_eq!(store.find_column("todo").unwrap().task_ids(), vec![2, 1]);
            assert_eq!(store.find_column("done").unwrap().task_ids(), vec![4]);
        }

        it "fails with not found for a task missing from the source column" {
            let before = store.snapshot();
            let err = store.move_task(99, "todo", "done").unwrap_err();

            assert_eq!(err, BoardError::TaskNotFound { task_id: 99, column: "todo".to_string() });
            assert_eq!(store.snapshot(), before);
        }

        it "fails with not found for an unknown column" {
            let before = store.snapshot();

            assert!(store.move_task(1, "archive", "done").unwrap_err().is_not_found());
            assert!(store.move_task(1, "todo", "archive").unwrap_err().is_not_found());
            assert_eq!(store.snapshot(), before);
        }
    }

    describe "find_column" {
        it "returns the column by key" {
            let column = store.find_column("inProgress").unwrap();
            assert_eq!(column.title, "In Progress");
        }

        it "fails for an unknown key" {
            assert_eq!(
                store.find_column("backlog").unwrap_err(),
                BoardError::ColumnNotFound { key: "backlog".to_string() }
            );
        }
    }

    describe "invariants" {
        it "keeps every created task in exactly one column" {
            let mut created = Vec::new();
            for i in 0..4 {
                created.push(store.create_task(input(&format!("Task {}", i), Priority::Low)).unwrap().id);
            }
            store.move_task(created[0], "todo", "done").unwrap();
            store.move_task(created[1], "todo", "inProgress").unwrap();
            store.move_task(created[1], "inProgress", "done").unwrap();
            let _ = store.move_task(created[2], "done", "todo");
            store.move_task(created[3], "todo", "todo").unwrap();

            let ids = assert_disjoint(&store);
            for id in created.iter().chain([1, 2, 3, 4].iter()) {
                assert!(ids.contains(id), "task {} disappeared", id);
            }
            assert_eq!(ids.len(), 8);
        }
    }

    describe "drag transfer" {
        it "moves the dropped task from its source column" {
            let mut store = two_column_store();
            let mut session = DragTransferSession::new();

            session.arm(1, "todo");
            let payload = session.consume("done").expect("payload");
            assert_eq!(payload.task_id, 1);
            assert_eq!(payload.source_column, "todo");

            store.move_task(payload.task_id, &payload.source_column, "done").unwrap();
            assert!(store.find_column("todo").unwrap().tasks.is_empty());
            assert_eq!(store.find_column("done").unwrap().task_ids(), vec![1]);
        }

        it "returns nothing on a second consume" {
            let mut session = DragTransferSession::new();
            session.arm(1, "todo");

            assert!(session.consume("done").is_some());
            assert!(session.consume("done").is_none());
        }

        it "leaves the board untouched when cancelled" {
            let before = store.snapshot();
            let mut session = DragTransferSession::new();
            session.arm(1, "todo");
            session.cancel();

            assert_eq!(session.drop_onto("done", &mut store).unwrap(), None);
            assert_eq!(store.snapshot(), before);
        }

        it "surfaces a stale payload as not found" {
            let mut session = DragTransferSession::new();
            session.arm(1, "todo");
            store.move_task(1, "todo", "done").unwrap();
            let before = store.snapshot();

            let err = session.drop_onto("inProgress", &mut store).unwrap_err();
            assert!(err.is_not_found());
            assert_eq!(store.snapshot(), before);
            assert!(!session.is_armed());
        }

        it "drops the latest pick-up when a stale one was never dropped" {
            let mut session = DragTransferSession::new();
            session.arm(1, "todo");
            session.arm(3, "inProgress");

            let outcome = session.drop_onto("done", &mut store).unwrap();
            assert_eq!(outcome, Some(MoveOutcome::Moved));
            assert_eq!(store.find_column("done").unwrap().task_ids(), vec![4, 3]);
            assert_eq!(store.find_column("todo").unwrap().task_ids(), vec![1, 2]);
        }
    }

    describe "persistence" {
        it "saves after each successful mutation only" {
            let repo = MemoryRepository::new();
            let mut store = BoardStore::hydrate(Box::new(repo.clone()), Board::sample(), "todo")
                .expect("Failed to hydrate");
            assert_eq!(repo.save_count(), 1);

            store.create_task(input("Persisted", Priority::High)).unwrap();
            store.move_task(5, "todo", "done").unwrap();
            store.move_task(5, "done", "done").unwrap();
            let _ = store.create_task(input("", Priority::High));
            let _ = store.move_task(99, "todo", "done");

            assert_eq!(repo.save_count(), 3);
            assert_eq!(repo.stored().unwrap(), store.snapshot());
        }

        it "rejects a stored board with a task in two columns" {
            let mut board = Board::sample();
            let duplicate = board.columns[0].tasks[0].clone();
            board.columns[1].tasks.push(duplicate);
            let repo = MemoryRepository::with_board(board);

            assert!(BoardStore::hydrate(Box::new(repo), Board::sample(), "todo").is_err());
        }
    }
}
