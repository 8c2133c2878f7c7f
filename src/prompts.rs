//! Prompt templates. Each template spells out the line format the classifier expects.

use crate::models::{ContentRequest, EducationLevel, ExtractionRequest, QuestionType};

fn header(lesson: &str, topic: &str, level: EducationLevel, request: &str) -> String {
    format!(
        "Ders: {}\nKonu: {}\nEğitim Seviyesi: {}\nİstek: {}",
        lesson,
        topic,
        level.capitalized(),
        request
    )
}

/// Build the question prompt for one pass.
pub fn question_prompt(request: &ExtractionRequest) -> String {
    match request.question_type {
        QuestionType::Classic => classic_prompt(request),
        QuestionType::Test => test_prompt(request),
    }
}

pub fn classic_prompt(request: &ExtractionRequest) -> String {
    format!(
        r#"{header}

Bu ders ve konu hakkında {count} adet KLASİK soru-cevap çifti oluştur.
Sorular doğrudan konunun kendisiyle ilgili olsun; "nasıl öğrenilir" türünden sorular sorma.
Ders sayısal içerikliyse işlem gerektiren sorulara da yer ver ve çözümde işlemleri ile formülleri göster.
Ders tamamen sözelse sözel sorular hazırla.
Sorular eğitim seviyesine uygun ve farklı zorluk seviyelerinde olsun.

Format:
Soru 1: [Açık ve net soru]
Cevap 1: [Detaylı cevap]

Soru 2: [Açık ve net soru]
Cevap 2: [Detaylı cevap]

Türkçe yaz."#,
        header = header(
            &request.lesson_name,
            &request.topic_name,
            request.education_level,
            &request.user_prompt
        ),
        count = request.per_type_count,
    )
}

pub fn test_prompt(request: &ExtractionRequest) -> String {
    format!(
        r#"{header}

Bu ders ve konu hakkında {count} adet ÇOK SEÇENEKLİ TEST sorusu oluştur.
Sorular doğrudan konuyla ilgili olsun; "nasıl öğrenilir" türünden sorular sorma.
Konu sayısalsa hem işlem gerektiren hem sözel sorular, tamamen sözelse yalnızca sözel sorular hazırla.
Her sorunun tam olarak 4 seçeneği olsun ve sorular eğitim seviyesine uygun, farklı zorluklarda olsun.
Her soru için doğru cevabı ve nedenini anlatan kısa bir açıklama ekle.

Format:
Soru 1: [Soru metni]
A) [Seçenek]
B) [Seçenek]
C) [Seçenek]
D) [Seçenek]
Doğru Cevap: [A, B, C veya D]
Açıklama: [Kısa açıklama]

Türkçe yaz."#,
        header = header(
            &request.lesson_name,
            &request.topic_name,
            request.education_level,
            &request.user_prompt
        ),
        count = request.per_type_count,
    )
}

pub fn learning_content_prompt(request: &ContentRequest) -> String {
    format!(
        r#"{header}

Bu ders ve konu hakkında eğitici ve kapsamlı bir içerik oluştur.
İçerik {level} seviyesine uygun olsun ve şunları içersin:
1. Konuya giriş ve temel tanımlar
2. Ayrıntılar ve ileri seviye konuların tamamı
3. Önemli kavramlar ve açıklamaları
4. Pratik örnekler
5. Özet ve sonuç

İçerik Türkçe olsun."#,
        header = header(
            &request.lesson_name,
            &request.topic.name,
            request.education_level,
            &request.user_prompt
        ),
        level = request.education_level.raw_value(),
    )
}
