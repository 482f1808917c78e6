//! The catalog store.

use crate::clock::ClockHandle;
use crate::command::{Change, Command, Confirm, Outcome, Prompt};
use crate::error::{ErrorKind, Result};
use crate::models::{Book, BookId, Draft, Status, StatusFilter};
use crate::{query, snapshot, sweep};
use exn::{OptionExt, ResultExt};
use stacks_storage::{BackendHandle, SlotKey};
use time::Duration;
use tokio::sync::watch;
use tracing::instrument;

/// How long a checkout lasts unless configured otherwise.
pub const DEFAULT_LOAN_PERIOD: Duration = Duration::days(14);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Added to today's date to get the due date of a new checkout.
    pub loan_period: Duration,
}
impl Default for CatalogOptions {
    fn default() -> Self {
        Self { loan_period: DEFAULT_LOAN_PERIOD }
    }
}

/// An ordered collection of books mirrored to a storage slot.
///
/// The newest record comes first. Every mutation builds the next version of
/// the collection, writes it to the slot, and only then swaps it in, so a
/// failed write leaves both memory and storage as they were. Each committed
/// mutation bumps the revision published by [`subscribe`](Self::subscribe).
pub struct Catalog {
    books: Vec<Book>,
    backend: BackendHandle,
    slot: SlotKey,
    clock: ClockHandle,
    options: CatalogOptions,
    revision: watch::Sender<u64>,
}

impl Catalog {
    /// Load the collection from `slot` (an unwritten slot is an empty
    /// catalog) and run an initial overdue sweep.
    #[instrument(skip_all, fields(backend = backend.name(), %slot))]
    pub async fn open(
        backend: BackendHandle,
        slot: SlotKey,
        clock: ClockHandle,
        options: CatalogOptions,
    ) -> Result<Self> {
        let books = match backend.read_optional(&slot).await.or_raise(|| ErrorKind::Storage)? {
            Some(data) => snapshot::parse(data)?,
            None => {
                tracing::info!("Slot has never been written; starting with an empty catalog");
                Vec::new()
            },
        };
        let (revision, _) = watch::channel(0);
        let mut catalog = Self { books, backend, slot, clock, options, revision };
        catalog.sweep_overdue().await?;
        Ok(catalog)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id() == id)
    }

    /// Watch the revision counter. It changes after every persisted mutation,
    /// which is the cue for a front end to redraw.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Run a [`Command`], asking `confirm` where the operation requires it.
    pub async fn execute<C: Confirm + ?Sized>(&mut self, command: Command, confirm: &C) -> Result<Outcome> {
        Ok(match command {
            Command::Add(draft) => Outcome::Added(self.add(draft).await?.clone()),
            Command::Update { id, draft } => Outcome::Updated(self.update(&id, draft).await?.clone()),
            Command::Checkout(id) => match self.checkout(&id, confirm).await? {
                Change::Applied(book) => Outcome::CheckedOut(book),
                Change::Declined => Outcome::Declined,
            },
            Command::Return(id) => match self.return_book(&id, confirm).await? {
                Change::Applied(book) => Outcome::Returned(book),
                Change::Declined => Outcome::Declined,
            },
            Command::Delete(id) => match self.delete(&id, confirm).await? {
                Change::Applied(book) => Outcome::Deleted(book),
                Change::Declined => Outcome::Declined,
            },
            Command::Sweep => Outcome::Swept { overdue: self.sweep_overdue().await? },
            Command::Import(data) => match self.import_snapshot(data, confirm).await? {
                Change::Applied(count) => Outcome::Imported { count },
                Change::Declined => Outcome::Declined,
            },
        })
    }

    /// Add a new, available book at the front of the collection.
    #[instrument(skip_all)]
    pub async fn add(&mut self, draft: Draft) -> Result<&Book> {
        let draft = draft.validate()?;
        let book = Book::new(self.next_id(), draft, self.clock.today());
        tracing::debug!(id = %book.id(), "Adding book");
        let mut next = self.books.clone();
        next.insert(0, book);
        self.commit(next).await?;
        Ok(&self.books[0])
    }

    /// Replace title, author and ISBN of an existing book.
    #[instrument(skip(self, draft))]
    pub async fn update(&mut self, id: &BookId, draft: Draft) -> Result<&Book> {
        let draft = draft.validate()?;
        let index = self.index_of(id)?;
        let mut next = self.books.clone();
        next[index].edit(draft);
        self.commit(next).await?;
        Ok(&self.books[index])
    }

    /// Lend out an available book for the configured loan period.
    #[instrument(skip(self, confirm))]
    pub async fn checkout<C: Confirm + ?Sized>(&mut self, id: &BookId, confirm: &C) -> Result<Change<Book>> {
        let index = self.index_with_status(id, Status::Available)?;
        if !confirm.confirm(&Prompt::Checkout { title: self.books[index].title() }) {
            return Ok(Change::Declined);
        }
        let due = self.clock.today().checked_add(self.options.loan_period).ok_or_raise(|| ErrorKind::DateOutOfRange)?;
        let mut next = self.books.clone();
        next[index].check_out(due);
        self.commit(next).await?;
        Ok(Change::Applied(self.books[index].clone()))
    }

    /// Put a checked-out book back on the shelf.
    #[instrument(skip(self, confirm))]
    pub async fn return_book<C: Confirm + ?Sized>(&mut self, id: &BookId, confirm: &C) -> Result<Change<Book>> {
        let index = self.index_with_status(id, Status::CheckedOut)?;
        if !confirm.confirm(&Prompt::Return { title: self.books[index].title() }) {
            return Ok(Change::Declined);
        }
        let mut next = self.books.clone();
        next[index].check_in();
        self.commit(next).await?;
        Ok(Change::Applied(self.books[index].clone()))
    }

    /// Remove a book for good. Returns the removed record.
    #[instrument(skip(self, confirm))]
    pub async fn delete<C: Confirm + ?Sized>(&mut self, id: &BookId, confirm: &C) -> Result<Change<Book>> {
        let index = self.index_of(id)?;
        if !confirm.confirm(&Prompt::Delete { title: self.books[index].title() }) {
            return Ok(Change::Declined);
        }
        let mut next = self.books.clone();
        let removed = next.remove(index);
        self.commit(next).await?;
        Ok(Change::Applied(removed))
    }

    /// Lazy case-insensitive search; see [`query::search`].
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Book> + use<'a> {
        query::search(&self.books, query)
    }

    pub fn filter_by_status(&self, filter: StatusFilter) -> impl Iterator<Item = &Book> {
        query::filter_by_status(&self.books, filter)
    }

    /// Look up a book by its ISBN/RFID tag without changing anything.
    pub fn scan_tag(&self, tag: &str) -> Result<&Book> {
        query::scan_tag(&self.books, tag)
    }

    pub fn recommend(&self) -> Vec<&Book> {
        query::recommend(&self.books)
    }

    /// Recompute every overdue flag against today and persist, even when
    /// nothing changed. Returns how many books are overdue.
    #[instrument(skip(self), fields(books = self.books.len()))]
    pub async fn sweep_overdue(&mut self) -> Result<usize> {
        let mut next = self.books.clone();
        let overdue = sweep::refresh(&mut next, self.clock.today());
        if overdue > 0 {
            tracing::info!(overdue, "Found overdue books");
        }
        self.commit(next).await?;
        Ok(overdue)
    }

    /// The whole collection as pretty-printed JSON.
    pub fn export_snapshot(&self) -> Result<String> {
        snapshot::export(&self.books)
    }

    /// Replace the whole collection with a snapshot, after confirmation.
    ///
    /// The snapshot is validated before the user is asked anything; a bad
    /// file never reaches the prompt. Overdue flags are recomputed on the way
    /// in. Returns the number of imported records.
    #[instrument(skip_all, fields(bytes = data.as_ref().len()))]
    pub async fn import_snapshot<C: Confirm + ?Sized>(
        &mut self,
        data: impl AsRef<[u8]>,
        confirm: &C,
    ) -> Result<Change<usize>> {
        let mut next = snapshot::parse(data)?;
        if !confirm.confirm(&Prompt::Import { count: next.len() }) {
            return Ok(Change::Declined);
        }
        let overdue = sweep::refresh(&mut next, self.clock.today());
        let count = next.len();
        self.commit(next).await?;
        tracing::info!(count, overdue, "Imported snapshot");
        Ok(Change::Applied(count))
    }

    fn index_of(&self, id: &BookId) -> Result<usize> {
        self.books.iter().position(|book| book.id() == id).ok_or_raise(|| ErrorKind::NotFound(id.clone()))
    }

    fn index_with_status(&self, id: &BookId, status: Status) -> Result<usize> {
        let index = self.index_of(id)?;
        let current = self.books[index].status();
        if current != status {
            exn::bail!(ErrorKind::InvalidStatus { id: id.clone(), status: current });
        }
        Ok(index)
    }

    /// Ids are creation milliseconds; bump past any collision so they stay unique.
    fn next_id(&self) -> BookId {
        let mut millis = self.clock.now().unix_timestamp_nanos() / 1_000_000;
        loop {
            let id = BookId::from_millis(millis);
            if self.get(&id).is_none() {
                return id;
            }
            millis += 1;
        }
    }

    async fn commit(&mut self, next: Vec<Book>) -> Result<()> {
        let data = snapshot::encode(&next)?;
        self.backend.write(&self.slot, &data).await.or_raise(|| ErrorKind::Storage)?;
        self.books = next;
        self.revision.send_modify(|revision| *revision += 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::command::AutoConfirm;
    use async_trait::async_trait;
    use stacks_storage::backend::{LocalBackend, MockBackend};
    use stacks_storage::{SlotBackend, validate_key};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use time::macros::date;

    const SLOT: &str = "library-books";
    const YES: AutoConfirm = AutoConfirm(true);
    const NO: AutoConfirm = AutoConfirm(false);

    struct Fixture {
        backend: Arc<MockBackend>,
        clock: Arc<FixedClock>,
        catalog: Catalog,
    }

    async fn fixture_with(slots: Vec<(&str, &str)>) -> Fixture {
        let backend = Arc::new(MockBackend::with_slots(slots));
        let clock = Arc::new(FixedClock::on(date!(2026 - 10 - 18)));
        let catalog = Catalog::open(backend.clone(), validate_key(SLOT).unwrap(), clock.clone(), CatalogOptions::default())
            .await
            .unwrap();
        Fixture { backend, clock, catalog }
    }

    async fn fixture() -> Fixture {
        fixture_with(Vec::new()).await
    }

    async fn persisted(backend: &MockBackend) -> Vec<Book> {
        snapshot::parse(backend.contents(SLOT).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_open_missing_slot_is_empty() {
        let Fixture { backend, catalog, .. } = fixture().await;
        assert!(catalog.is_empty());
        // The open-time sweep persists the (empty) collection.
        assert_eq!(backend.write_count(), 1);
        assert!(persisted(&backend).await.is_empty());
    }

    #[tokio::test]
    async fn test_open_rejects_garbage() {
        let backend = Arc::new(MockBackend::with_slots([(SLOT, "not json")]));
        let clock = Arc::new(FixedClock::on(date!(2026 - 10 - 18)));
        let err = Catalog::open(backend.clone(), validate_key(SLOT).unwrap(), clock, CatalogOptions::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(&*err, ErrorKind::InvalidSnapshot(_)));
        assert_eq!(backend.write_count(), 0);
        assert_eq!(backend.contents(SLOT).await.unwrap(), b"not json");
    }

    #[tokio::test]
    async fn test_add_prepends_available_book() {
        let mut f = fixture().await;
        f.catalog.add(Draft::new("Dune", "Frank Herbert")).await.unwrap();
        let book = f.catalog.add(Draft::new("  Emma ", " Jane Austen").with_isbn("  ")).await.unwrap().clone();
        assert_eq!(f.catalog.len(), 2);
        assert_eq!(f.catalog.books()[0], book);
        assert_eq!(book.title(), "Emma");
        assert_eq!(book.author(), "Jane Austen");
        assert_eq!(book.isbn(), None);
        assert_eq!(book.status(), Status::Available);
        assert_eq!(book.due_date(), None);
        assert!(!book.is_overdue());
        assert_eq!(book.date_added(), date!(2026 - 10 - 18));
        assert_eq!(persisted(&f.backend).await, f.catalog.books());
    }

    #[tokio::test]
    async fn test_add_ids_are_unique_millis() {
        let mut f = fixture().await;
        let first = f.catalog.add(Draft::new("A", "X")).await.unwrap().id().clone();
        // Same instant: the second id is bumped by one millisecond.
        let second = f.catalog.add(Draft::new("B", "Y")).await.unwrap().id().clone();
        let millis = date!(2026 - 10 - 18).midnight().assume_utc().unix_timestamp() * 1000;
        assert_eq!(first.as_str(), millis.to_string());
        assert_eq!(second.as_str(), (millis + 1).to_string());
    }

    #[tokio::test]
    async fn test_add_requires_title_and_author() {
        let mut f = fixture().await;
        let writes = f.backend.write_count();
        for draft in [Draft::new("", "Author"), Draft::new("Title", ""), Draft::new("   ", "Author")] {
            assert!(f.catalog.add(draft).await.is_err());
        }
        assert!(f.catalog.is_empty());
        assert_eq!(f.backend.write_count(), writes);
    }

    #[tokio::test]
    async fn test_update() {
        let mut f = fixture().await;
        let id = f.catalog.add(Draft::new("Dnue", "Frank Herbert")).await.unwrap().id().clone();
        let book = f.catalog.update(&id, Draft::new("Dune", "Frank Herbert").with_isbn("9780441013593")).await.unwrap();
        assert_eq!(book.title(), "Dune");
        assert_eq!(book.isbn(), Some("9780441013593"));
        assert_eq!(book.date_added(), date!(2026 - 10 - 18));

        let err = f.catalog.update(&BookId::new("nope"), Draft::new("T", "A")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        let err = f.catalog.update(&id, Draft::new("", "A")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingField("title")));
        assert_eq!(f.catalog.get(&id).unwrap().title(), "Dune");
    }

    #[tokio::test]
    async fn test_checkout_sets_due_date() {
        let mut f = fixture().await;
        let id = f.catalog.add(Draft::new("Dune", "Frank Herbert")).await.unwrap().id().clone();
        let book = f.catalog.checkout(&id, &YES).await.unwrap().applied().unwrap();
        assert_eq!(book.status(), Status::CheckedOut);
        assert_eq!(book.due_date(), Some(date!(2026 - 11 - 01)));
        assert!(!book.is_overdue());

        let writes = f.backend.write_count();
        let err = f.catalog.checkout(&id, &YES).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidStatus { status: Status::CheckedOut, .. }));
        assert_eq!(f.catalog.get(&id), Some(&book));
        assert_eq!(f.backend.write_count(), writes);
    }

    #[tokio::test]
    async fn test_checkout_uses_loan_period() {
        let backend = Arc::new(MockBackend::default());
        let clock = Arc::new(FixedClock::on(date!(2026 - 10 - 18)));
        let options = CatalogOptions { loan_period: Duration::days(7) };
        let mut catalog = Catalog::open(backend, validate_key(SLOT).unwrap(), clock, options).await.unwrap();
        let id = catalog.add(Draft::new("Dune", "Frank Herbert")).await.unwrap().id().clone();
        let book = catalog.checkout(&id, &YES).await.unwrap().applied().unwrap();
        assert_eq!(book.due_date(), Some(date!(2026 - 10 - 25)));
    }

    #[tokio::test]
    async fn test_return() {
        let mut f = fixture().await;
        let id = f.catalog.add(Draft::new("Dune", "Frank Herbert")).await.unwrap().id().clone();
        let err = f.catalog.return_book(&id, &YES).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidStatus { status: Status::Available, .. }));

        f.catalog.checkout(&id, &YES).await.unwrap();
        let book = f.catalog.return_book(&id, &YES).await.unwrap().applied().unwrap();
        assert_eq!(book.status(), Status::Available);
        assert_eq!(book.due_date(), None);
        assert!(!book.is_overdue());
    }

    #[tokio::test]
    async fn test_declined_is_noop() {
        let mut f = fixture().await;
        let id = f.catalog.add(Draft::new("Dune", "Frank Herbert")).await.unwrap().id().clone();
        let before = f.catalog.books().to_vec();
        let writes = f.backend.write_count();
        assert_eq!(f.catalog.checkout(&id, &NO).await.unwrap(), Change::Declined);
        assert_eq!(f.catalog.delete(&id, &NO).await.unwrap(), Change::Declined);
        let data = f.catalog.export_snapshot().unwrap();
        assert_eq!(f.catalog.import_snapshot(&data, &NO).await.unwrap(), Change::Declined);
        assert_eq!(f.catalog.books(), before);
        assert_eq!(f.backend.write_count(), writes);
    }

    #[tokio::test]
    async fn test_delete() {
        let mut f = fixture().await;
        let keep = f.catalog.add(Draft::new("Emma", "Jane Austen")).await.unwrap().id().clone();
        let id = f.catalog.add(Draft::new("Dune", "Frank Herbert")).await.unwrap().id().clone();
        let removed = f.catalog.delete(&id, &YES).await.unwrap().applied().unwrap();
        assert_eq!(removed.title(), "Dune");
        assert_eq!(f.catalog.len(), 1);
        assert!(f.catalog.get(&keep).is_some());
        let err = f.catalog.delete(&id, &YES).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(missing) if missing == &id));
    }

    #[tokio::test]
    async fn test_overdue_example() {
        let mut f = fixture().await;
        let a = f.catalog.add(Draft::new("A", "X")).await.unwrap().id().clone();
        let b = f.catalog.add(Draft::new("B", "Y")).await.unwrap().id().clone();
        let c = f.catalog.add(Draft::new("C", "Z")).await.unwrap().id().clone();
        // B is due yesterday: checked out 15 days ago with a 14 day loan.
        f.clock.set(date!(2026 - 10 - 03).midnight().assume_utc());
        f.catalog.checkout(&b, &YES).await.unwrap();
        // C is due next week.
        f.clock.set(date!(2026 - 10 - 11).midnight().assume_utc());
        f.catalog.checkout(&c, &YES).await.unwrap();
        f.clock.set(date!(2026 - 10 - 18).midnight().assume_utc());

        assert_eq!(f.catalog.sweep_overdue().await.unwrap(), 1);
        assert!(!f.catalog.get(&a).unwrap().is_overdue());
        assert!(f.catalog.get(&b).unwrap().is_overdue());
        assert!(!f.catalog.get(&c).unwrap().is_overdue());
        let overdue: Vec<_> = f.catalog.filter_by_status(StatusFilter::Overdue).map(|book| book.id().clone()).collect();
        assert_eq!(overdue, [b]);

        // Idempotent, but always persisted.
        let before = f.catalog.books().to_vec();
        let writes = f.backend.write_count();
        assert_eq!(f.catalog.sweep_overdue().await.unwrap(), 1);
        assert_eq!(f.catalog.books(), before);
        assert_eq!(f.backend.write_count(), writes + 1);
    }

    #[tokio::test]
    async fn test_open_sweeps() {
        let data = r#"[{"id":"1","title":"Dune","author":"Frank Herbert","isbn":"N/A","status":"checked-out",
            "dueDate":"2026-10-01","dateAdded":"2026-09-17","overdue":false}]"#;
        let f = fixture_with(vec![(SLOT, data)]).await;
        assert!(f.catalog.books()[0].is_overdue());
        assert!(persisted(&f.backend).await[0].is_overdue());
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let mut f = fixture().await;
        f.catalog.add(Draft::new("Dune", "Frank Herbert").with_isbn("9780441013593")).await.unwrap();
        let id = f.catalog.add(Draft::new("Emma", "Jane Austen")).await.unwrap().id().clone();
        f.catalog.checkout(&id, &YES).await.unwrap();
        // Typed in as the placeholder; stored the same as no ISBN at all.
        let typed = f.catalog.add(Draft::new("Persuasion", "Jane Austen").with_isbn("N/A")).await.unwrap();
        assert_eq!(typed.isbn(), None);
        let before = f.catalog.books().to_vec();
        let data = f.catalog.export_snapshot().unwrap();

        let mut other = fixture().await;
        other.catalog.add(Draft::new("Something", "Else")).await.unwrap();
        assert_eq!(other.catalog.import_snapshot(&data, &YES).await.unwrap(), Change::Applied(3));
        assert_eq!(other.catalog.books(), before);
        assert_eq!(persisted(&other.backend).await, before);
        assert_eq!(other.catalog.search("n/a").count(), f.catalog.search("n/a").count());
    }

    #[tokio::test]
    async fn test_import_rejects_bad_data_before_asking() {
        struct Panics;
        impl Confirm for Panics {
            fn confirm(&self, prompt: &Prompt<'_>) -> bool {
                panic!("should not be asked: {prompt}");
            }
        }
        let mut f = fixture().await;
        f.catalog.add(Draft::new("Dune", "Frank Herbert")).await.unwrap();
        let err = f.catalog.import_snapshot(r#"{"not":"an array"}"#, &Panics).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidSnapshot(_)));
        assert_eq!(f.catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_import_prompt_shows_count() {
        struct Expect(usize);
        impl Confirm for Expect {
            fn confirm(&self, prompt: &Prompt<'_>) -> bool {
                *prompt == Prompt::Import { count: self.0 }
            }
        }
        let mut f = fixture().await;
        assert_eq!(f.catalog.import_snapshot("[]", &Expect(0)).await.unwrap(), Change::Applied(0));
        assert!(f.catalog.is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_sees_mutations() {
        let mut f = fixture().await;
        let mut revisions = f.catalog.subscribe();
        let start = *revisions.borrow_and_update();
        let id = f.catalog.add(Draft::new("Dune", "Frank Herbert")).await.unwrap().id().clone();
        assert!(revisions.has_changed().unwrap());
        assert_eq!(*revisions.borrow_and_update(), start + 1);
        f.catalog.checkout(&id, &NO).await.unwrap();
        assert!(!revisions.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_search_and_recommend() {
        let mut f = fixture().await;
        f.catalog.add(Draft::new("Emma", "Jane Austen")).await.unwrap();
        f.catalog.add(Draft::new("Dune", "Frank Herbert")).await.unwrap();
        assert!(f.catalog.recommend().is_empty());
        let id = f.catalog.add(Draft::new("Dune Messiah", "Frank Herbert")).await.unwrap().id().clone();
        assert_eq!(f.catalog.search("").count(), 3);
        assert_eq!(f.catalog.search("DUNE").count(), 2);
        assert!(f.catalog.recommend().is_empty());
        f.catalog.checkout(&id, &YES).await.unwrap();
        assert_eq!(f.catalog.recommend().len(), 3);
    }

    #[tokio::test]
    async fn test_execute() {
        let mut f = fixture().await;
        let outcome = f.catalog.execute(Command::Add(Draft::new("Dune", "Frank Herbert")), &YES).await.unwrap();
        assert_eq!(outcome.to_string(), "\"Dune\" has been added to the library!");
        let id = f.catalog.books()[0].id().clone();
        let outcome = f.catalog.execute(Command::Checkout(id.clone()), &YES).await.unwrap();
        assert_eq!(outcome.to_string(), "\"Dune\" has been checked out. Due date: 2026-11-01");
        let outcome = f.catalog.execute(Command::Return(id.clone()), &NO).await.unwrap();
        assert_eq!(outcome, Outcome::Declined);
        let outcome = f.catalog.execute(Command::Sweep, &YES).await.unwrap();
        assert_eq!(outcome, Outcome::Swept { overdue: 0 });
        let outcome = f.catalog.execute(Command::Import(b"[]".to_vec()), &YES).await.unwrap();
        assert_eq!(outcome, Outcome::Imported { count: 0 });
        assert!(f.catalog.execute(Command::Delete(id), &YES).await.is_err());
    }

    /// Wraps a mock backend and refuses writes while `failing` is set.
    struct FlakyBackend {
        inner: MockBackend,
        failing: AtomicBool,
    }

    #[async_trait]
    impl SlotBackend for FlakyBackend {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn exists(&self, key: &SlotKey) -> stacks_storage::error::Result<bool> {
            self.inner.exists(key).await
        }

        async fn read(&self, key: &SlotKey) -> stacks_storage::error::Result<Vec<u8>> {
            self.inner.read(key).await
        }

        async fn write(&self, key: &SlotKey, data: &[u8]) -> stacks_storage::error::Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                exn::bail!(stacks_storage::error::ErrorKind::PermissionDenied(key.as_str().into()));
            }
            self.inner.write(key, data).await
        }
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_state_intact() {
        let backend = Arc::new(FlakyBackend { inner: MockBackend::default(), failing: AtomicBool::new(false) });
        let clock = Arc::new(FixedClock::on(date!(2026 - 10 - 18)));
        let mut catalog = Catalog::open(backend.clone(), validate_key(SLOT).unwrap(), clock, CatalogOptions::default())
            .await
            .unwrap();
        let id = catalog.add(Draft::new("Dune", "Frank Herbert")).await.unwrap().id().clone();
        let before = catalog.books().to_vec();
        let stored = backend.inner.contents(SLOT).await;
        let mut revisions = catalog.subscribe();
        revisions.mark_unchanged();

        backend.failing.store(true, Ordering::SeqCst);
        let err = catalog.add(Draft::new("Emma", "Jane Austen")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Storage));
        assert!(err.is_retryable());
        assert!(catalog.checkout(&id, &YES).await.is_err());
        assert!(catalog.delete(&id, &YES).await.is_err());
        assert!(catalog.sweep_overdue().await.is_err());

        assert_eq!(catalog.books(), before);
        assert_eq!(backend.inner.contents(SLOT).await, stored);
        assert!(!revisions.has_changed().unwrap());
    }

    async fn open_local(root: &std::path::Path, clock: ClockHandle) -> Catalog {
        let backend = Arc::new(LocalBackend::new("local", root).unwrap());
        Catalog::open(backend, validate_key(SLOT).unwrap(), clock, CatalogOptions::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_reopen_from_local_directory() {
        let dir = tempfile::tempdir().unwrap();
        let clock: ClockHandle = Arc::new(FixedClock::on(date!(2026 - 10 - 18)));

        let mut catalog = open_local(dir.path(), clock.clone()).await;
        let id = catalog.add(Draft::new("Dune", "Frank Herbert")).await.unwrap().id().clone();
        catalog.checkout(&id, &YES).await.unwrap();
        let before = catalog.books().to_vec();
        drop(catalog);
        assert!(dir.path().join("library-books.json").is_file());

        let reopened = open_local(dir.path(), clock).await;
        assert_eq!(reopened.books(), before);
    }
}
