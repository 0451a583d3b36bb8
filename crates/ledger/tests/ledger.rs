use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use ledger::{Budget, Ledger, LedgerError, Money, TransactionCmd, TransferCmd, User};
use migration::MigratorTrait;
use uuid::Uuid;

async fn ledger_with_db() -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (ledger, db)
}

async fn user_with_budget(ledger: &Ledger, name: &str, balance: i64) -> (User, Budget) {
    let user = ledger.create_user(name).await.unwrap();
    let budget = ledger
        .create_budget(user.id, "Main", Money::new(balance))
        .await
        .unwrap();
    (user, budget)
}

async fn balance_of(ledger: &Ledger, budget: &Budget) -> Money {
    ledger
        .lookup_budget_owned(budget.owner_user_id, budget.id)
        .await
        .unwrap()
        .balance
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

#[tokio::test]
async fn transfer_round_trip_restores_balances() {
    let (ledger, _db) = ledger_with_db().await;
    let (user, a) = user_with_budget(&ledger, "alice", 10_000).await;
    let b = ledger
        .create_budget(user.id, "Savings", Money::new(2_550))
        .await
        .unwrap();

    let amount: Money = "33.33".parse().unwrap();
    let out = ledger
        .transfer(TransferCmd::new(user.id, a.id, b.id, amount))
        .await
        .unwrap();
    assert_eq!(out.from_balance, Money::new(6_667));
    assert_eq!(out.to_balance, Money::new(5_883));

    let back = ledger
        .transfer(TransferCmd::new(user.id, b.id, a.id, amount))
        .await
        .unwrap();
    assert_eq!(back.from_balance, Money::new(2_550));
    assert_eq!(back.to_balance, Money::new(10_000));
    assert_eq!(balance_of(&ledger, &a).await, Money::new(10_000));
    assert_eq!(balance_of(&ledger, &b).await, Money::new(2_550));
}

#[tokio::test]
async fn transfer_more_than_balance_fails_and_changes_nothing() {
    let (ledger, _db) = ledger_with_db().await;
    let (user, a) = user_with_budget(&ledger, "alice", 8_000).await;
    let b = ledger
        .create_budget(user.id, "Other", Money::new(1_000))
        .await
        .unwrap();

    let err = ledger
        .transfer(TransferCmd::new(user.id, a.id, b.id, Money::new(10_000)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds(_)), "{err:?}");
    assert_eq!(balance_of(&ledger, &a).await, Money::new(8_000));
    assert_eq!(balance_of(&ledger, &b).await, Money::new(1_000));
}

#[tokio::test]
async fn transfer_of_whole_balance_empties_the_source() {
    let (ledger, _db) = ledger_with_db().await;
    let (user, a) = user_with_budget(&ledger, "alice", 8_000).await;
    let b = ledger
        .create_budget(user.id, "Other", Money::ZERO)
        .await
        .unwrap();

    let out = ledger
        .transfer(TransferCmd::new(user.id, a.id, b.id, Money::new(8_000)))
        .await
        .unwrap();
    assert_eq!(out.from_balance, Money::ZERO);
    assert_eq!(out.to_balance, Money::new(8_000));
}

#[tokio::test]
async fn transfer_into_another_users_budget_is_not_owned() {
    let (ledger, _db) = ledger_with_db().await;
    let (alice, alice_budget) = user_with_budget(&ledger, "alice", 10_000).await;
    let (_bob, bob_budget) = user_with_budget(&ledger, "bob", 500).await;

    let err = ledger
        .transfer(TransferCmd::new(
            alice.id,
            alice_budget.id,
            bob_budget.id,
            Money::new(1_000),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotOwned(_)), "{err:?}");
    assert_eq!(balance_of(&ledger, &alice_budget).await, Money::new(10_000));
    assert_eq!(balance_of(&ledger, &bob_budget).await, Money::new(500));

    // Same when the foreign budget is the source.
    let err = ledger
        .transfer(TransferCmd::new(
            alice.id,
            bob_budget.id,
            alice_budget.id,
            Money::new(100),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotOwned(_)), "{err:?}");
}

#[tokio::test]
async fn transfer_rejects_bad_input() {
    let (ledger, _db) = ledger_with_db().await;
    let (user, a) = user_with_budget(&ledger, "alice", 1_000).await;
    let b = ledger
        .create_budget(user.id, "Other", Money::ZERO)
        .await
        .unwrap();

    for amount in [Money::ZERO, Money::new(-5)] {
        let err = ledger
            .transfer(TransferCmd::new(user.id, a.id, b.id, amount))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)), "{err:?}");
    }

    let err = ledger
        .transfer(TransferCmd::new(user.id, a.id, a.id, Money::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)), "{err:?}");

    let err = ledger
        .transfer(TransferCmd::new(user.id, a.id, Uuid::new_v4(), Money::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)), "{err:?}");
    assert_eq!(balance_of(&ledger, &a).await, Money::new(1_000));
}

async fn freeze_budget(db: &DatabaseConnection, budget_id: Uuid) {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        format!(
            "CREATE TRIGGER freeze_budget BEFORE UPDATE ON budgets \
             WHEN OLD.id = '{budget_id}' BEGIN SELECT RAISE(ABORT, 'frozen'); END"
        ),
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn failed_second_write_rolls_back_the_first() {
    let (ledger, db) = ledger_with_db().await;
    let (user, a) = user_with_budget(&ledger, "alice", 5_000).await;
    let b = ledger
        .create_budget(user.id, "Other", Money::new(3_000))
        .await
        .unwrap();

    // Writes go in id order, so freezing the larger id makes the first write
    // land before the second one fails.
    let (first, frozen) = if a.id < b.id { (&a, &b) } else { (&b, &a) };
    freeze_budget(&db, frozen.id).await;

    // Frozen budget credited: the debit of `first` must be undone.
    // Frozen budget debited: the credit of `first` must be undone.
    for (from, to) in [(first, frozen), (frozen, first)] {
        let err = ledger
            .transfer(TransferCmd::new(user.id, from.id, to.id, Money::new(1_000)))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::StoreUnavailable(_)), "{err:?}");
        assert!(err.is_retryable());
        assert_eq!(balance_of(&ledger, &a).await, Money::new(5_000));
        assert_eq!(balance_of(&ledger, &b).await, Money::new(3_000));
    }
}

#[tokio::test]
async fn add_transaction_spends_down_to_zero_then_refuses() {
    let (ledger, _db) = ledger_with_db().await;
    let (user, budget) = user_with_budget(&ledger, "alice", 8_000).await;

    let tx = ledger
        .add_transaction(
            TransactionCmd::new(user.id, budget.id, Money::new(8_000), "Landlord").date(day(1)),
        )
        .await
        .unwrap();
    assert_eq!(tx.amount, Money::new(8_000));
    assert_eq!(tx.budget_id, budget.id);
    assert_eq!(balance_of(&ledger, &budget).await, Money::ZERO);
    assert_eq!(
        ledger
            .list_transactions_for_budget(user.id, budget.id)
            .await
            .unwrap(),
        vec![tx]
    );

    let err = ledger
        .add_transaction(TransactionCmd::new(
            user.id,
            budget.id,
            Money::new(100),
            "Bakery",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds(_)), "{err:?}");
    assert_eq!(balance_of(&ledger, &budget).await, Money::ZERO);
    assert_eq!(
        ledger
            .list_transactions_for_budget(user.id, budget.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn add_transaction_validates_and_checks_ownership() {
    let (ledger, _db) = ledger_with_db().await;
    let (alice, budget) = user_with_budget(&ledger, "alice", 1_000).await;
    let bob = ledger.create_user("bob").await.unwrap();

    let err = ledger
        .add_transaction(TransactionCmd::new(alice.id, budget.id, Money::ZERO, "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)), "{err:?}");

    let err = ledger
        .add_transaction(TransactionCmd::new(alice.id, budget.id, Money::new(1), "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)), "{err:?}");

    let err = ledger
        .add_transaction(TransactionCmd::new(bob.id, budget.id, Money::new(1), "Shop"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotOwned(_)), "{err:?}");

    let err = ledger
        .add_transaction(TransactionCmd::new(alice.id, Uuid::new_v4(), Money::new(1), "Shop"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)), "{err:?}");

    assert_eq!(balance_of(&ledger, &budget).await, Money::new(1_000));
}

#[tokio::test]
async fn user_transactions_are_listed_newest_first() {
    let (ledger, _db) = ledger_with_db().await;
    let (user, food) = user_with_budget(&ledger, "alice", 10_000).await;
    let fun = ledger
        .create_budget(user.id, "Fun", Money::new(10_000))
        .await
        .unwrap();

    for (budget, d, recipient) in [(&food, 3, "Market"), (&fun, 9, "Cinema"), (&food, 5, "Bakery")] {
        ledger
            .add_transaction(
                TransactionCmd::new(user.id, budget.id, Money::new(250), recipient).date(day(d)),
            )
            .await
            .unwrap();
    }

    let recipients: Vec<_> = ledger
        .list_transactions_for_user(user.id)
        .await
        .unwrap()
        .into_iter()
        .map(|tx| tx.recipient)
        .collect();
    assert_eq!(recipients, ["Cinema", "Bakery", "Market"]);
    assert_eq!(balance_of(&ledger, &food).await, Money::new(9_500));
}

#[tokio::test]
async fn delete_user_leaves_nothing_behind() {
    let (ledger, db) = ledger_with_db().await;
    let (user, budget) = user_with_budget(&ledger, "alice", 5_000).await;
    ledger
        .create_budget(user.id, "Second", Money::new(10))
        .await
        .unwrap();
    ledger
        .add_transaction(TransactionCmd::new(user.id, budget.id, Money::new(10), "Shop"))
        .await
        .unwrap();
    let (other, _) = user_with_budget(&ledger, "bob", 1).await;

    ledger.delete_user(user.id).await.unwrap();

    assert!(ledger.list_budgets_for_user(user.id).await.unwrap().is_empty());
    assert!(
        ledger
            .list_transactions_for_user(user.id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(matches!(
        ledger.get_user(user.id).await,
        Err(LedgerError::NotFound(_))
    ));
    assert!(matches!(
        ledger.delete_user(user.id).await,
        Err(LedgerError::NotFound(_))
    ));

    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT (SELECT COUNT(*) FROM budgets) AS budgets, \
             (SELECT COUNT(*) FROM transactions) AS transactions",
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get::<i64>("", "budgets").unwrap(), 1);
    assert_eq!(row.try_get::<i64>("", "transactions").unwrap(), 0);
    assert_eq!(ledger.list_budgets_for_user(other.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn create_budget_validates_input() {
    let (ledger, _db) = ledger_with_db().await;
    let user = ledger.create_user("alice").await.unwrap();

    let err = ledger
        .create_budget(user.id, "Rent", Money::new(-1))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)), "{err:?}");

    let err = ledger
        .create_budget(user.id, " \t ", Money::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)), "{err:?}");

    let err = ledger
        .create_budget(Uuid::new_v4(), "Rent", Money::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)), "{err:?}");

    let budget = ledger
        .create_budget(user.id, "  Rent   and  bills ", Money::ZERO)
        .await
        .unwrap();
    assert_eq!(budget.name, "Rent and bills");
    assert_eq!(budget.owner_user_id, user.id);
}

#[tokio::test]
async fn budgets_are_scoped_to_their_owner() {
    let (ledger, _db) = ledger_with_db().await;
    let (alice, budget) = user_with_budget(&ledger, "alice", 700).await;
    let bob = ledger.create_user("bob").await.unwrap();

    assert_eq!(
        ledger.lookup_budget_owned(alice.id, budget.id).await.unwrap(),
        budget
    );
    for result in [
        ledger.lookup_budget_owned(bob.id, budget.id).await.map(|_| ()),
        ledger.rename_budget(bob.id, budget.id, "Mine").await.map(|_| ()),
        ledger.delete_budget(bob.id, budget.id).await,
        ledger
            .list_transactions_for_budget(bob.id, budget.id)
            .await
            .map(|_| ()),
        ledger
            .delete_transactions_for_budget(bob.id, budget.id)
            .await
            .map(|_| ()),
    ] {
        assert!(matches!(result, Err(LedgerError::NotOwned(_))), "{result:?}");
    }
    assert!(matches!(
        ledger.lookup_budget_owned(alice.id, Uuid::new_v4()).await,
        Err(LedgerError::NotFound(_))
    ));
    assert_eq!(ledger.lookup_budget_owned(alice.id, budget.id).await.unwrap().name, "Main");
}

#[tokio::test]
async fn rename_budget_and_user() {
    let (ledger, _db) = ledger_with_db().await;
    let (user, budget) = user_with_budget(&ledger, "alice", 700).await;

    let renamed = ledger
        .rename_budget(user.id, budget.id, "Holidays")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Holidays");
    assert_eq!(renamed.balance, Money::new(700));
    assert_eq!(
        ledger.lookup_budget_owned(user.id, budget.id).await.unwrap().name,
        "Holidays"
    );
    assert!(matches!(
        ledger.rename_budget(user.id, budget.id, "").await,
        Err(LedgerError::InvalidInput(_))
    ));
    assert!(matches!(
        ledger.rename_budget(user.id, Uuid::new_v4(), "Ghost").await,
        Err(LedgerError::NotFound(_))
    ));

    let user = ledger.rename_user(user.id, "Alice Liddell").await.unwrap();
    assert_eq!(ledger.get_user(user.id).await.unwrap().name, "Alice Liddell");
    assert!(matches!(
        ledger.rename_user(Uuid::new_v4(), "nobody").await,
        Err(LedgerError::NotFound(_))
    ));
    assert!(matches!(
        ledger.create_user("").await,
        Err(LedgerError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn listings_are_ordered_by_name() {
    let (ledger, _db) = ledger_with_db().await;
    let carol = ledger.create_user("carol").await.unwrap();
    let alice = ledger.create_user("alice").await.unwrap();
    for name in ["Rent", "Food", "Travel"] {
        ledger
            .create_budget(alice.id, name, Money::ZERO)
            .await
            .unwrap();
    }

    let users: Vec<_> = ledger
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(users, [alice.id, carol.id]);

    let budgets: Vec<_> = ledger
        .list_budgets_for_user(alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(budgets, ["Food", "Rent", "Travel"]);
    assert!(ledger.list_budgets_for_user(carol.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_budget_takes_its_transactions() {
    let (ledger, _db) = ledger_with_db().await;
    let (user, budget) = user_with_budget(&ledger, "alice", 1_000).await;
    let kept = ledger
        .create_budget(user.id, "Kept", Money::new(1_000))
        .await
        .unwrap();
    for b in [&budget, &kept] {
        ledger
            .add_transaction(TransactionCmd::new(user.id, b.id, Money::new(100), "Shop"))
            .await
            .unwrap();
    }

    ledger.delete_budget(user.id, budget.id).await.unwrap();

    assert!(matches!(
        ledger.lookup_budget_owned(user.id, budget.id).await,
        Err(LedgerError::NotFound(_))
    ));
    let remaining = ledger.list_transactions_for_user(user.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].budget_id, kept.id);
}

#[tokio::test]
async fn delete_all_budgets_for_user_counts_removed() {
    let (ledger, _db) = ledger_with_db().await;
    let (user, budget) = user_with_budget(&ledger, "alice", 1_000).await;
    ledger
        .create_budget(user.id, "Second", Money::ZERO)
        .await
        .unwrap();
    ledger
        .add_transaction(TransactionCmd::new(user.id, budget.id, Money::new(1), "Shop"))
        .await
        .unwrap();
    let (bob, bob_budget) = user_with_budget(&ledger, "bob", 1).await;

    assert_eq!(ledger.delete_all_budgets_for_user(user.id).await.unwrap(), 2);
    assert!(ledger.list_budgets_for_user(user.id).await.unwrap().is_empty());
    assert!(
        ledger
            .list_transactions_for_user(user.id)
            .await
            .unwrap()
            .is_empty()
    );
    // The user itself survives.
    assert_eq!(ledger.get_user(user.id).await.unwrap().name, "alice");
    assert_eq!(
        ledger.list_budgets_for_user(bob.id).await.unwrap(),
        vec![bob_budget]
    );
    assert_eq!(ledger.delete_all_budgets_for_user(user.id).await.unwrap(), 0);
}

#[tokio::test]
async fn clearing_history_keeps_the_balance() {
    let (ledger, _db) = ledger_with_db().await;
    let (user, budget) = user_with_budget(&ledger, "alice", 1_000).await;
    for amount in [100, 250] {
        ledger
            .add_transaction(TransactionCmd::new(
                user.id,
                budget.id,
                Money::new(amount),
                "Shop",
            ))
            .await
            .unwrap();
    }

    let removed = ledger
        .delete_transactions_for_budget(user.id, budget.id)
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert!(
        ledger
            .list_transactions_for_budget(user.id, budget.id)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(balance_of(&ledger, &budget).await, Money::new(650));
}

#[tokio::test]
async fn negative_balance_is_rejected_by_the_schema() {
    let (ledger, db) = ledger_with_db().await;
    let (_user, budget) = user_with_budget(&ledger, "alice", 10).await;

    let result = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            format!("UPDATE budgets SET balance = -1 WHERE id = '{}'", budget.id),
        ))
        .await;
    assert!(result.is_err());
    assert_eq!(balance_of(&ledger, &budget).await, Money::new(10));
}
