//! User-facing messages (Turkish locale).
//!
//! Internal error text never reaches these strings; callers log the detail
//! and hand one of these to the UI.

pub const AUTH_MISSING_CREDENTIALS: &str = "Kullanıcı adı ve şifre gereklidir";
pub const AUTH_SUCCESS: &str = "Giriş başarılı!";
pub const AUTH_INVALID_PASSWORD: &str = "Geçersiz şifre";
pub const AUTH_USER_NOT_FOUND: &str = "Kullanıcı bulunamadı";
pub const AUTH_FAILURE: &str = "Kimlik doğrulama sırasında bir hata oluştu";
pub const LOGIN_REQUIRED: &str = "Lütfen önce giriş yapın";
pub const LOGOUT_SUCCESS: &str = "Çıkış yapıldı.";

pub const SUBMIT_SUCCESS: &str = "Havuz ölçümü başarıyla gönderildi.";
pub const SUBMIT_NO_HOTEL: &str =
    "Kullanıcı bir otelle ilişkilendirilmemiş. Lütfen yöneticiyle iletişime geçin.";
pub const SUBMIT_VALIDATION_PREFIX: &str = "Doğrulama hatası: ";
pub const SUBMIT_FAILURE: &str =
    "Sistem hatası nedeniyle gönderim başarısız oldu. Lütfen daha sonra tekrar deneyin.";
pub const SUBMIT_DUPLICATE: &str =
    "Aynı saniye içinde başka bir ölçüm gönderildi. Lütfen tekrar deneyin.";
pub const SUBMIT_READONLY: &str = "Bu ölçüm incelemede veya tamamlandı; değiştirilemez.";
pub const SUBMIT_FORBIDDEN: &str = "Bu ölçüm üzerinde işlem yetkiniz yok.";
pub const READING_NOT_FOUND: &str = "Ölçüm bulunamadı";
pub const READING_LOAD_FAILED: &str = "Ölçüm yüklenemedi. Lütfen daha sonra tekrar deneyin.";
pub const READING_CHANGED: &str =
    "Ölçüm bu sırada başka bir kullanıcı tarafından güncellendi. Lütfen sayfayı yenileyip tekrar deneyin.";

pub const STATUS_UPDATED: &str = "Durum güncellendi.";
pub const STATUS_UPDATE_FAILED: &str = "Durum güncellenemedi.";
pub const STATUS_FORBIDDEN: &str = "Durumu yalnızca yöneticiler değiştirebilir.";
pub const STATUS_INVALID: &str = "Geçersiz durum.";

pub const REQUEST_BODY_INVALID: &str = "istek gövdesi okunamadı veya alanlar hatalı";
pub const REQUEST_QUERY_INVALID: &str = "sorgu parametreleri hatalı";

pub const DASHBOARD_FAILURE: &str = "Gönderimler yüklenemedi. Lütfen daha sonra tekrar deneyin.";
