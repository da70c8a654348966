//! Integration tests for the language repository

use core_kernel::CultureCode;
use domain_dictionary::{DictionaryError, DictionaryFilter, LanguageFilter};
use infra_db::{
    DatabaseError, DictionaryRepository, LanguageRepository, ReadRepository, WriteRepository,
};
use test_utils::{
    assert_single_default, db_test, LanguageFixtures, TestDatabase, TestDictionaryItemBuilder,
    TestLanguageBuilder,
};

// ============================================================================
// Lookups
// ============================================================================

mod lookup_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_by_iso_code_and_default() {
        let (db, languages) = TestDatabase::with_languages().await.unwrap();
        let repository = LanguageRepository::new();

        let mut scope = db.scope().await.unwrap();
        let danish = repository
            .get_by_iso_code(&mut scope, &CultureCode::parse("da-dk").unwrap())
            .await
            .unwrap()
            .unwrap();
        let default = repository.get_default(&mut scope).await.unwrap().unwrap();
        let missing = repository
            .get_by_iso_code(&mut scope, &CultureCode::parse("ja-JP").unwrap())
            .await
            .unwrap();
        scope.complete().await.unwrap();

        assert_eq!(danish, languages.danish);
        assert_eq!(default.id, languages.english.id);
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_all_and_filters() {
        let (db, languages) = TestDatabase::with_languages().await.unwrap();
        let repository = LanguageRepository::new();

        let mut scope = db.scope().await.unwrap();
        let all = repository.get_all(&mut scope).await.unwrap();
        let mandatory = repository
            .count(&mut scope, &LanguageFilter::IsMandatory)
            .await
            .unwrap();
        let french_and_mandatory = repository
            .exists(
                &mut scope,
                &LanguageFilter::IsMandatory
                    .and(LanguageFilter::IsoCodeEquals(languages.french.iso_code.clone())),
            )
            .await
            .unwrap();
        let danish_default = repository
            .exists(
                &mut scope,
                &LanguageFilter::IsDefault
                    .and(LanguageFilter::IsoCodeEquals(languages.danish.iso_code.clone())),
            )
            .await
            .unwrap();
        scope.complete().await.unwrap();

        let codes: Vec<_> = all.iter().map(|l| l.iso_code.as_str()).collect();
        assert_eq!(codes, vec!["da-DK", "en-US", "fr-FR"]);
        assert_single_default(&all);
        assert_eq!(mandatory, 1);
        assert!(french_and_mandatory);
        assert!(!danish_default);
    }

    #[tokio::test]
    async fn test_get_many_omits_missing_ids() {
        let (db, languages) = TestDatabase::with_languages().await.unwrap();
        let repository = LanguageRepository::new();

        let mut scope = db.scope().await.unwrap();
        let found = repository
            .get_many(&mut scope, &[languages.french_id(), 404, languages.english_id()])
            .await
            .unwrap();
        scope.complete().await.unwrap();

        let codes: Vec<_> = found.iter().map(|l| l.iso_code.as_str()).collect();
        assert_eq!(codes, vec!["fr-FR", "en-US"]);
    }
}

// ============================================================================
// Default language rule
// ============================================================================

mod default_tests {
    use super::*;

    db_test!(test_first_language_becomes_default, |db| {
        let repository = LanguageRepository::new();

        let mut danish = LanguageFixtures::danish();
        let mut scope = db.scope().await.unwrap();
        repository.add_or_update(&mut scope, &mut danish).await.unwrap();
        scope.complete().await.unwrap();

        assert!(danish.is_default);
    });

    #[tokio::test]
    async fn test_failed_default_insert_keeps_previous_default() {
        let (db, languages) = TestDatabase::with_languages().await.unwrap();
        let repository = LanguageRepository::new();

        let mut duplicate = TestLanguageBuilder::new()
            .with_iso_code("en-us")
            .with_culture_name("English again")
            .default_language()
            .build();

        let mut scope = db.scope().await.unwrap();
        let result = repository.add_or_update(&mut scope, &mut duplicate).await;
        assert!(matches!(result, Err(DatabaseError::DuplicateEntry(_))));
        scope.complete().await.unwrap();

        let mut scope = db.scope().await.unwrap();
        let count = repository.count(&mut scope, &LanguageFilter::IsDefault).await.unwrap();
        let default = repository.get_default(&mut scope).await.unwrap().unwrap();
        scope.complete().await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(default.id, languages.english.id);
        assert!(duplicate.id.is_none());
    }

    #[tokio::test]
    async fn test_saving_new_default_clears_previous() {
        let (db, languages) = TestDatabase::with_languages().await.unwrap();
        let repository = LanguageRepository::new();

        let mut danish = languages.danish.clone().as_default();
        let mut scope = db.scope().await.unwrap();
        repository.add_or_update(&mut scope, &mut danish).await.unwrap();
        scope.complete().await.unwrap();

        let mut scope = db.scope().await.unwrap();
        let all = repository.get_all(&mut scope).await.unwrap();
        let default = repository.get_default(&mut scope).await.unwrap().unwrap();
        scope.complete().await.unwrap();

        assert_single_default(&all);
        assert_eq!(default.id, languages.danish.id);
    }

    #[tokio::test]
    async fn test_inserting_second_default_keeps_single_default() {
        let (db, _languages) = TestDatabase::with_languages().await.unwrap();
        let repository = LanguageRepository::new();

        let mut german = LanguageFixtures::german().as_default();
        let mut scope = db.scope().await.unwrap();
        repository.add_or_update(&mut scope, &mut german).await.unwrap();
        let count = repository.count(&mut scope, &LanguageFilter::IsDefault).await.unwrap();
        scope.complete().await.unwrap();

        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_default_cannot_be_unset_directly() {
        let (db, languages) = TestDatabase::with_languages().await.unwrap();
        let repository = LanguageRepository::new();

        let mut english = languages.english.clone();
        english.is_default = false;

        let mut scope = db.scope().await.unwrap();
        let result = repository.add_or_update(&mut scope, &mut english).await;
        scope.rollback().await.unwrap();

        assert!(matches!(
            result,
            Err(DatabaseError::Validation(DictionaryError::InvalidLanguage(_)))
        ));
    }

    #[tokio::test]
    async fn test_default_cannot_be_deleted() {
        let (db, languages) = TestDatabase::with_languages().await.unwrap();
        let repository = LanguageRepository::new();

        let mut scope = db.scope().await.unwrap();
        let result = repository.delete(&mut scope, &languages.english).await;
        scope.rollback().await.unwrap();

        assert!(matches!(
            result,
            Err(DatabaseError::Validation(DictionaryError::CannotDeleteDefaultLanguage(_)))
        ));
        assert_eq!(db.count_rows("languages").await.unwrap(), 3);
    }
}

// ============================================================================
// Writes
// ============================================================================

mod write_tests {
    use super::*;

    #[tokio::test]
    async fn test_update_language_fields() {
        let (db, languages) = TestDatabase::with_languages().await.unwrap();
        let repository = LanguageRepository::new();

        let mut danish = languages
            .danish
            .clone()
            .as_mandatory()
            .with_fallback(languages.english_id());
        danish.culture_name = "Danish".to_string();

        let mut scope = db.scope().await.unwrap();
        repository.add_or_update(&mut scope, &mut danish).await.unwrap();
        let loaded = repository.get(&mut scope, languages.danish_id()).await.unwrap().unwrap();
        scope.complete().await.unwrap();

        assert_eq!(loaded, danish);
        assert_eq!(loaded.fallback_language_id, Some(languages.english_id()));
    }

    #[tokio::test]
    async fn test_duplicate_iso_code_is_rejected() {
        let (db, _languages) = TestDatabase::with_languages().await.unwrap();
        let repository = LanguageRepository::new();

        let mut again = TestLanguageBuilder::new()
            .with_iso_code("en-us")
            .with_culture_name("English again")
            .build();

        let mut scope = db.scope().await.unwrap();
        let result = repository.add_or_update(&mut scope, &mut again).await;
        scope.rollback().await.unwrap();

        assert!(matches!(result, Err(DatabaseError::DuplicateEntry(_))));
    }

    #[tokio::test]
    async fn test_missing_fallback_is_rejected() {
        let (db, _languages) = TestDatabase::with_languages().await.unwrap();
        let repository = LanguageRepository::new();

        let mut spanish = TestLanguageBuilder::new().with_fallback(404).build();

        let mut scope = db.scope().await.unwrap();
        let result = repository.add_or_update(&mut scope, &mut spanish).await;
        scope.rollback().await.unwrap();

        assert!(matches!(result, Err(DatabaseError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn test_blank_culture_name_is_rejected() {
        let db = TestDatabase::new().await.unwrap();
        let repository = LanguageRepository::new();

        let mut unnamed = TestLanguageBuilder::new().with_culture_name(" ").build();

        let mut scope = db.scope().await.unwrap();
        let result = repository.add_or_update(&mut scope, &mut unnamed).await;
        scope.rollback().await.unwrap();

        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_translations_and_fallbacks() {
        let (db, languages) = TestDatabase::with_languages().await.unwrap();
        let languages_repo = LanguageRepository::new();
        let items = DictionaryRepository::new();

        let mut french = languages.french.clone().with_fallback(languages.danish_id());
        let mut item = TestDictionaryItemBuilder::new()
            .with_key("Thanks")
            .with_translation(languages.english_id(), "Thank you")
            .with_translation(languages.danish_id(), "Tak")
            .build();

        let mut scope = db.scope().await.unwrap();
        languages_repo.add_or_update(&mut scope, &mut french).await.unwrap();
        items.add_or_update(&mut scope, &mut item).await.unwrap();
        languages_repo.delete(&mut scope, &languages.danish).await.unwrap();
        scope.complete().await.unwrap();

        let mut scope = db.scope().await.unwrap();
        let french = languages_repo.get(&mut scope, languages.french_id()).await.unwrap().unwrap();
        let item = items.get_by_key(&mut scope, "Thanks").await.unwrap().unwrap();
        let danish_items = items
            .count(&mut scope, &DictionaryFilter::HasTranslationFor(languages.danish_id()))
            .await
            .unwrap();
        scope.complete().await.unwrap();

        assert_eq!(french.fallback_language_id, None);
        assert_eq!(item.translations.len(), 1);
        assert_eq!(item.translation(languages.english_id()), Some("Thank you"));
        assert_eq!(danish_items, 0);
        assert_eq!(db.count_rows("languages").await.unwrap(), 2);
    }
}
